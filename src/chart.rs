//! The spending by category chart.
//!
//! The expense list page only renders an empty chart. The browser then fetches
//! the category totals from [get_chart_data] with the same `year`/`month` query
//! as the page and fills in the chart.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use charming::{
    Chart,
    component::{Legend, Title},
    element::{JsFunction, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    aggregation::{CategoryTotal, aggregate_by_category},
    expense::get_expenses,
    filter::FilterQuery,
    html::HeadElement,
};

/// The HTML element ID of the chart container.
pub const CATEGORY_CHART_ID: &str = "category-chart";

/// Where the ECharts library is served from.
pub const ECHARTS_SCRIPT_PATH: &str = "/static/echarts.6.0.0.min.js";

/// Category totals in the shape the chart consumes.
///
/// `labels[i]` is the category whose total is `data[i]`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

impl From<Vec<CategoryTotal>> for ChartData {
    fn from(totals: Vec<CategoryTotal>) -> Self {
        let (labels, data) = totals
            .into_iter()
            .map(|category_total| (category_total.category, category_total.total))
            .unzip();

        Self { labels, data }
    }
}

/// The state needed to get the chart data.
#[derive(Debug, Clone)]
pub struct ChartDataState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ChartDataState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that returns the total spent per category as JSON.
pub async fn get_chart_data(
    State(state): State<ChartDataState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ChartData>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let expenses = get_expenses(query.filter(), &connection)?;

    Ok(Json(aggregate_by_category(&expenses).into()))
}

/// The chart options without any data, see [chart_script].
///
/// Each category is a slice of a doughnut sized by its share of the total.
pub fn category_chart() -> Chart {
    Chart::new()
        .title(Title::new().text("Spending by Category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left("center").top("bottom"))
        .series(Pie::new().name("Total").radius(vec!["40%", "70%"]))
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return currencyFormatter.format(number);",
    )
}

/// The container the chart is drawn into.
pub fn chart_view() -> Markup {
    html!(
        section class="w-full mb-4"
        {
            div
                id=(CATEGORY_CHART_ID)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}
        }
    )
}

/// JavaScript that draws the chart and loads its data from `data_url`.
pub fn chart_script(data_url: &str) -> HeadElement {
    let data_url = serde_json::to_string(data_url).unwrap_or_else(|error| {
        tracing::error!("Could not encode chart data URL {data_url:?}: {error}");
        "\"\"".to_owned()
    });

    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{CATEGORY_CHART_ID}");
            const chart = echarts.init(chartDom);
            chart.setOption({options});

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();

            fetch({data_url})
                .then((response) => response.ok ? response.json() : Promise.reject(response.status))
                .then((chartData) => chart.setOption({{
                    series: [{{
                        data: chartData.labels.map((name, i) => ({{ name, value: chartData.data[i] }})),
                    }}],
                }}))
                .catch((error) => console.error("Could not load chart data:", error));
        }});"#,
        options = category_chart(),
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        aggregation::CategoryTotal,
        db::initialize,
        expense::{NewExpense, create_expense},
        filter::FilterQuery,
        html::HeadElement,
    };

    use super::{ChartData, ChartDataState, category_chart, chart_script, get_chart_data};

    fn get_test_state() -> ChartDataState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        for (date, category, amount) in [
            (date!(2024 - 01 - 05), "Food", 10.0),
            (date!(2024 - 01 - 10), "Transport", 5.0),
            (date!(2024 - 01 - 20), "Food", 2.5),
            (date!(2023 - 12 - 24), "Gifts", 50.0),
        ] {
            create_expense(
                NewExpense::new(date, "Test", category, amount).unwrap(),
                &conn,
            )
            .unwrap();
        }

        ChartDataState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[test]
    fn chart_data_keeps_category_order() {
        let chart_data = ChartData::from(vec![
            CategoryTotal {
                category: "Rent".to_owned(),
                total: 400.0,
            },
            CategoryTotal {
                category: "Food".to_owned(),
                total: 12.5,
            },
        ]);

        assert_eq!(
            chart_data,
            ChartData {
                labels: vec!["Rent".to_owned(), "Food".to_owned()],
                data: vec![400.0, 12.5],
            }
        );
    }

    #[tokio::test]
    async fn chart_data_is_filtered_by_month() {
        let state = get_test_state();

        let chart_data = get_chart_data(
            State(state),
            Query(FilterQuery {
                year: Some("2024".to_owned()),
                month: Some("1".to_owned()),
            }),
        )
        .await
        .unwrap()
        .0;

        // Most recent first, so Food is seen first.
        assert_eq!(
            chart_data,
            ChartData {
                labels: vec!["Food".to_owned(), "Transport".to_owned()],
                data: vec![12.5, 5.0],
            }
        );
    }

    #[tokio::test]
    async fn chart_data_without_filter_covers_everything() {
        let state = get_test_state();

        let chart_data = get_chart_data(State(state), Query(FilterQuery::default()))
            .await
            .unwrap()
            .0;

        assert_eq!(chart_data.labels.len(), 3);
        assert_eq!(chart_data.data.iter().sum::<f64>(), 67.5);
    }

    #[test]
    fn chart_data_serializes_as_labels_and_data() {
        let chart_data = ChartData {
            labels: vec!["Food".to_owned()],
            data: vec![1.5],
        };

        assert_eq!(
            serde_json::to_string(&chart_data).unwrap(),
            r#"{"labels":["Food"],"data":[1.5]}"#
        );
    }

    #[test]
    fn script_fetches_data_url() {
        let HeadElement::ScriptSource(script) = chart_script("/api/chart-data?year=2024&month=1")
        else {
            panic!("want script source");
        };

        assert!(script.0.contains(r#"fetch("/api/chart-data?year=2024&month=1")"#));
        assert!(script.0.contains("category-chart"));
        assert!(script.0.contains("chartData.labels.map"));
    }

    #[test]
    fn chart_is_a_doughnut() {
        let options = category_chart().to_string();

        assert!(options.contains(r#""pie""#), "{options}");
        assert!(options.contains(r#""40%""#), "{options}");
        assert!(options.contains(r#""70%""#), "{options}");
        assert!(!options.contains("xAxis"), "{options}");
    }
}
