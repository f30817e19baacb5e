use serde::Serialize;

// Cumulative upper threshold plus the marginal rate inside the bracket.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TaxBracket {
    pub threshold: f64,
    pub rate: f64,
}

#[derive(Clone, Debug)]
pub struct TaxTable {
    pub brackets: Vec<TaxBracket>,
    pub dependent_credit_monthly: f64,
}

impl TaxTable {
    // Austrian 2024 brackets; 166 EUR/month Familienbonus per dependent.
    pub fn austria_2024() -> Self {
        Self {
            brackets: vec![
                TaxBracket {
                    threshold: 11_693.0,
                    rate: 0.0,
                },
                TaxBracket {
                    threshold: 19_134.0,
                    rate: 0.20,
                },
                TaxBracket {
                    threshold: 32_075.0,
                    rate: 0.30,
                },
                TaxBracket {
                    threshold: 62_080.0,
                    rate: 0.40,
                },
                TaxBracket {
                    threshold: 93_120.0,
                    rate: 0.48,
                },
                TaxBracket {
                    threshold: 1_000_000.0,
                    rate: 0.50,
                },
                TaxBracket {
                    threshold: f64::INFINITY,
                    rate: 0.55,
                },
            ],
            dependent_credit_monthly: 166.0,
        }
    }
}

// Percent fields are whole percents (3.5 means 3.5%).
#[derive(Debug, Clone)]
pub struct Inputs {
    pub gross_income: f64,
    pub existing_loan_payment: f64,
    pub property_price: f64,
    pub down_payment: f64,
    pub rental_yield: f64,
    pub loan_term: u32,
    pub interest_rate: f64,
    pub property_appreciation: f64,
    pub rent_increase: f64,
    pub additional_costs: f64,
    pub dependents: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSnapshot {
    pub year: u32,
    pub property_value: f64,
    pub loan_balance: f64,
    pub net_worth: f64,
    pub rental_income: f64,
    pub mortgage_payment: f64,
    pub taxable_income: f64,
    pub tax: f64,
    pub net_income: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub monthly_net_income: f64,
    pub available_monthly_payment: f64,
    pub max_property_price: f64,
    pub monthly_mortgage: f64,
    pub monthly_rent: f64,
    pub years: Vec<YearSnapshot>,
}
