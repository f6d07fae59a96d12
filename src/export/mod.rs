mod endpoint;
mod rows;

pub use endpoint::{ExportMode, get_export_csv};
pub use rows::{
    EMPLOYEE_EXPORT_HEADER, EmployeeRow, WITHDRAWAL_EXPORT_HEADER, WithdrawalRow,
    export_employee_rows, export_withdrawal_rows,
};
