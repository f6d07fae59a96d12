mod create_endpoint;
mod create_page;
mod domain;
mod ledger;

pub use create_endpoint::create_withdrawal_endpoint;
pub use create_page::get_create_withdrawal_page;
pub use domain::{NewWithdrawal, Withdrawal, WithdrawalFormData, WithdrawalId};
pub use ledger::{
    RecentWithdrawal, create_withdrawal_table, get_recent_withdrawals,
    get_withdrawal_dates_and_amounts_since, get_withdrawals_for_employee, get_withdrawn_totals,
    map_row_to_withdrawal, record_withdrawal, remaining_salary, total_withdrawn, withdrawn_total,
};
