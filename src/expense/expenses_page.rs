//! Defines the route handler for the page that lists expenses alongside the
//! budget status, the new expense form and the spending chart.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    aggregation::total_amount,
    budget::{BudgetBand, BudgetMonitor, BudgetStatus},
    chart::{ECHARTS_SCRIPT_PATH, chart_script, chart_view},
    date_index::get_available_periods,
    endpoints::{self, format_endpoint, with_query},
    expense::{Expense, MAX_CATEGORY_LENGTH, MAX_DESCRIPTION_LENGTH, get_expenses},
    filter::{ExpenseFilter, FilterQuery, YearMonth},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, dollar_input_styles, format_currency,
    },
    timezone::today_in,
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The shared budget limit.
    pub budget: BudgetMonitor,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            budget: state.budget.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Everything the page displays, resolved for a single request.
struct ExpensesViewModel {
    filter: ExpenseFilter,
    expenses: Vec<Expense>,
    periods: Vec<YearMonth>,
    total_spent: f64,
    budget_limit: f64,
    budget_status: BudgetStatus,
    today: Date,
}

/// Render the expense list, optionally narrowed to the `year` and `month` in the query.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let filter = query.filter();

    let (expenses, periods) = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        (
            get_expenses(filter, &connection)?,
            get_available_periods(&connection)?,
        )
    };

    let total_spent = total_amount(&expenses);
    let budget_limit = state.budget.limit();

    let view_model = ExpensesViewModel {
        filter,
        expenses,
        periods,
        total_spent,
        budget_limit,
        budget_status: BudgetStatus::new(total_spent, budget_limit),
        today: today_in(&state.local_timezone),
    };

    Ok(expenses_view(&view_model).into_response())
}

fn expenses_view(view_model: &ExpensesViewModel) -> Markup {
    let query = view_model.filter.to_query_string();

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="w-full mb-4 text-2xl font-bold" { "Expense Tracker" }

            (budget_view(
                view_model.total_spent,
                view_model.budget_limit,
                view_model.budget_status,
            ))
            (new_expense_form(view_model.today))

            section class=(CARD_STYLE)
            {
                div class="flex flex-wrap items-end justify-between gap-4 mb-4"
                {
                    (period_selector(view_model.filter, &view_model.periods))

                    a
                        id="export-link"
                        href=(with_query(endpoints::EXPORT, &query))
                        class=(LINK_STYLE)
                    {
                        "Export CSV"
                    }
                }

                (chart_view())
                (expense_table(&view_model.expenses))
            }
        }
    );

    base(
        "Expenses",
        &[
            dollar_input_styles(),
            HeadElement::ScriptLink(ECHARTS_SCRIPT_PATH.to_owned()),
            chart_script(&with_query(endpoints::CHART_DATA, &query)),
        ],
        &content,
    )
}

fn band_style(band: BudgetBand) -> &'static str {
    match band {
        BudgetBand::Low => "bg-green-500",
        BudgetBand::Medium => "bg-yellow-400",
        BudgetBand::High => "bg-red-600",
    }
}

fn budget_view(total_spent: f64, budget_limit: f64, status: BudgetStatus) -> Markup {
    html!(
        section id="budget" class=(CARD_STYLE)
        {
            h2 class="mb-2 text-xl font-semibold" { "Budget" }

            p
            {
                "Spent " span id="total-spent" { (format_currency(total_spent)) }
                " of " span id="budget-limit" { (format_currency(budget_limit)) }
            }

            div class="w-full h-4 my-2 bg-gray-200 rounded-full dark:bg-gray-700"
            {
                div
                    id="budget-bar"
                    class={ "h-4 rounded-full " (band_style(status.band)) }
                    style=(format!("width: {:.1}%", status.percentage))
                {}
            }

            p id="budget-status" data-band=(status.band)
            {
                (format!("{:.1}%", status.percentage)) " used (" (status.band) ")"
            }

            form
                id="budget-form"
                method="post"
                action=(endpoints::UPDATE_BUDGET)
                class="flex items-end gap-2 mt-4"
            {
                div class="flex-1"
                {
                    label for="budget" class=(FORM_LABEL_STYLE) { "Budget limit" }

                    div class="input-wrapper"
                    {
                        input
                            type="number"
                            name="budget"
                            id="budget"
                            step="any"
                            value=(budget_limit)
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }
                }

                div
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update" }
                }
            }
        }
    )
}

fn new_expense_form(today: Date) -> Markup {
    html!(
        section class=(CARD_STYLE)
        {
            h2 class="mb-2 text-xl font-semibold" { "New Expense" }

            form
                id="new-expense-form"
                method="post"
                action=(endpoints::ROOT)
                class="grid grid-cols-1 md:grid-cols-2 gap-4"
            {
                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        type="date"
                        name="date"
                        id="date"
                        value=(today)
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    div class="input-wrapper"
                    {
                        input
                            type="number"
                            name="amount"
                            id="amount"
                            step="0.01"
                            placeholder="0.00"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        type="text"
                        name="description"
                        id="description"
                        maxlength=(MAX_DESCRIPTION_LENGTH)
                        placeholder="Coffee"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    input
                        type="text"
                        name="category"
                        id="category"
                        maxlength=(MAX_CATEGORY_LENGTH)
                        placeholder="Food"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div class="md:col-span-2"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
                }
            }
        }
    )
}

fn period_selector(filter: ExpenseFilter, periods: &[YearMonth]) -> Markup {
    html!(
        div
        {
            label for="period" class=(FORM_LABEL_STYLE) { "Period" }

            select
                id="period"
                class=(FORM_TEXT_INPUT_STYLE)
                onchange="window.location.href = this.value"
            {
                option value=(endpoints::ROOT) selected[filter == ExpenseFilter::All] { "All" }

                @for &period in periods {
                    @let period_filter = ExpenseFilter::Month(period);

                    option
                        value=(with_query(endpoints::ROOT, &period_filter.to_query_string()))
                        selected[filter == period_filter]
                    {
                        (period.label())
                    }
                }
            }
        }
    )
}

fn expense_table(expenses: &[Expense]) -> Markup {
    html!(
        div class="relative overflow-x-auto"
        {
            table id="expenses" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
                        {
                            td class=(TABLE_CELL_STYLE) { (expense.date) }
                            td class=(TABLE_CELL_STYLE) { (expense.description) }
                            td class=(TABLE_CELL_STYLE) { (expense.category) }
                            td class={ (TABLE_CELL_STYLE) " text-right" } { (format_currency(expense.amount)) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                form
                                    method="post"
                                    action=(format_endpoint(endpoints::DELETE_EXPENSE, expense.id))
                                {
                                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                                }
                            }
                        }
                    }

                    @if expenses.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="5" class={ (TABLE_CELL_STYLE) " text-center" }
                            {
                                "No expenses yet. Add one using the form above."
                            }
                        }
                    }
                }
            }
        }
    )
}
