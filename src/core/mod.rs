mod engine;
mod types;

pub use engine::{
    max_loan_amount, max_property_price, monthly_payment, net_income, run_projection, simulate,
    tax_for_income,
};
pub use types::{Inputs, Projection, TaxBracket, TaxTable, YearSnapshot};
