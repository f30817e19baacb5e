use super::types::{Inputs, Projection, TaxTable, YearSnapshot};

const SOCIAL_SECURITY_RATE: f64 = 0.1765;
// 1.5% annual depreciation on the building share of the current value.
const BUILDING_SHARE: f64 = 0.8;
const DEPRECIATION_RATE: f64 = 0.015;
// Flat marginal rate reported as the notional deduction in loss years.
const LOSS_OFFSET_RATE: f64 = 0.4;
const LOAN_SHARE: f64 = 0.8;
const AFFORDABILITY_SHARE: f64 = 0.4;

pub fn tax_for_income(table: &TaxTable, taxable_income: f64, dependents: u32) -> f64 {
    let mut total_tax = 0.0;
    let mut remaining = taxable_income;
    let mut previous_threshold = 0.0;

    for bracket in &table.brackets {
        let slice = remaining.max(0.0).min(bracket.threshold - previous_threshold);
        total_tax += slice * bracket.rate;
        remaining -= slice;
        if remaining <= 0.0 {
            break;
        }
        previous_threshold = bracket.threshold;
    }

    let dependent_credit = table.dependent_credit_monthly * 12.0 * dependents as f64;
    (total_tax - dependent_credit).max(0.0)
}

pub fn net_income(table: &TaxTable, gross_income: f64, dependents: u32) -> f64 {
    let tax = tax_for_income(table, gross_income, dependents);
    let social_security = gross_income * SOCIAL_SECURITY_RATE;
    gross_income - tax - social_security
}

pub fn monthly_payment(principal: f64, annual_rate_percent: f64, years: u32) -> f64 {
    let monthly_rate = annual_rate_percent / 12.0 / 100.0;
    let payments = (years * 12) as f64;
    // The closed form is undefined at zero rate; interest-free limit.
    if monthly_rate == 0.0 {
        return principal / payments;
    }
    let growth = (1.0 + monthly_rate).powf(payments);
    principal * monthly_rate * growth / (growth - 1.0)
}

pub fn max_loan_amount(monthly_payment: f64, annual_rate_percent: f64, years: u32) -> f64 {
    let monthly_rate = annual_rate_percent / 12.0 / 100.0;
    let payments = (years * 12) as f64;
    if monthly_rate == 0.0 {
        return monthly_payment * payments;
    }
    let growth = (1.0 + monthly_rate).powf(payments);
    monthly_payment * (growth - 1.0) / (monthly_rate * growth)
}

pub fn max_property_price(monthly_budget: f64, annual_rate_percent: f64, years: u32) -> f64 {
    max_loan_amount(monthly_budget, annual_rate_percent, years) / LOAN_SHARE
}

pub fn simulate(table: &TaxTable, inputs: &Inputs) -> Vec<YearSnapshot> {
    let loan_amount = inputs.property_price - inputs.down_payment;
    let yearly_mortgage =
        monthly_payment(loan_amount, inputs.interest_rate, inputs.loan_term) * 12.0;

    let mut loan_balance = loan_amount;
    let mut property_value = inputs.property_price;
    let mut rental_income = inputs.property_price * inputs.rental_yield / 100.0;

    let mut years = Vec::with_capacity(inputs.loan_term as usize);
    for year in 1..=inputs.loan_term {
        let interest_paid = loan_balance * (inputs.interest_rate / 100.0);
        let principal_paid = yearly_mortgage - interest_paid;

        let depreciation = property_value * BUILDING_SHARE * DEPRECIATION_RATE;
        let taxable_income = rental_income - depreciation - interest_paid;
        let tax = tax_for_income(table, taxable_income.max(0.0), inputs.dependents);

        let net_income =
            rental_income - yearly_mortgage - if taxable_income > 0.0 { tax } else { 0.0 };

        // Loss years report a notional deduction at a flat marginal rate;
        // net_income above excludes it.
        let reported_tax = if taxable_income > 0.0 {
            tax
        } else {
            taxable_income * LOSS_OFFSET_RATE
        };

        loan_balance = (loan_balance - principal_paid).max(0.0);
        property_value *= 1.0 + inputs.property_appreciation / 100.0;

        // End-of-year balance and value next to this year's income figures;
        // rent steps up only after the snapshot.
        years.push(YearSnapshot {
            year,
            property_value,
            loan_balance,
            net_worth: property_value - loan_balance,
            rental_income,
            mortgage_payment: yearly_mortgage,
            taxable_income,
            tax: reported_tax,
            net_income,
        });

        rental_income *= 1.0 + inputs.rent_increase / 100.0;
    }

    years
}

pub fn run_projection(table: &TaxTable, inputs: &Inputs) -> Projection {
    let yearly_net_income = net_income(table, inputs.gross_income, inputs.dependents);
    let monthly_net_income = yearly_net_income / 12.0;
    let available_monthly_payment =
        monthly_net_income * AFFORDABILITY_SHARE - inputs.existing_loan_payment;
    let max_price = max_property_price(
        available_monthly_payment,
        inputs.interest_rate,
        inputs.loan_term,
    );

    let years = simulate(table, inputs);
    let (monthly_mortgage, monthly_rent) = years
        .last()
        .map(|last| (last.mortgage_payment / 12.0, last.rental_income / 12.0))
        .unwrap_or((0.0, 0.0));

    Projection {
        monthly_net_income,
        available_monthly_payment,
        max_property_price: max_price,
        monthly_mortgage,
        monthly_rent,
        years,
    }
}
