mod create_endpoint;
mod create_page;
mod db;
mod delete_endpoint;
mod domain;
mod edit_endpoint;
mod edit_page;
mod employees_page;
mod history_page;

pub use create_endpoint::create_employee_endpoint;
pub use create_page::get_create_employee_page;
pub use db::{
    create_employee, create_employee_table, delete_employee, get_employee, get_employees,
    map_row_to_employee, update_employee,
};
pub use delete_endpoint::delete_employee_endpoint;
pub use domain::{Employee, EmployeeFormData, EmployeeId, EmployeeName, NewEmployee};
pub use edit_endpoint::edit_employee_endpoint;
pub use edit_page::get_edit_employee_page;
pub use employees_page::get_employees_page;
pub use history_page::get_employee_history_page;
