//! Dashboard controller: navigation modes, selection state and page assembly
//!
//! Every builder is a pure function of the loaded table and the current
//! selection. The page it returns is a declarative list of widgets that the
//! report layer turns into HTML.

use clap::ValueEnum;
use tracing::{debug, warn};

use crate::data::{
    CustomerTable, ATTRITION_FLAG, AVG_UTILIZATION_RATIO, CORRELATION_EXCLUDED, CREDIT_LIMIT,
    CUSTOMER_AGE, EDUCATION_LEVEL, GENDER, MARITAL_STATUS, TOTAL_RELATIONSHIP_COUNT,
    TOTAL_TRANS_AMT,
};
use crate::insights::{self, FEW_PRODUCTS, LOW_SPEND, LOW_UTILIZATION};
use crate::stats;
use crate::viz::{
    BarChart, BoxChart, Chart, DonutChart, Group, HeatmapChart, HistogramChart, PointGroup,
    ScatterChart,
};

pub const DASHBOARD_TITLE: &str = "Credit Card Analysis";
pub const DEFAULT_HEAD_ROWS: usize = 5;

const HISTOGRAM_BINS: usize = 25;
const HISTOGRAM_OPACITY: f64 = 0.75;
const DONUT_HOLE: f64 = 0.4;
const STATS_PER_ROW: usize = 3;

/// Sidebar navigation choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NavMode {
    /// Head of the table and numeric summaries
    #[default]
    Overview,
    /// Exploratory charts of selected columns
    Eda,
    /// Filtered charts with commentary
    Visualizations,
}

impl NavMode {
    pub const ALL: [NavMode; 3] = [NavMode::Overview, NavMode::Eda, NavMode::Visualizations];

    /// Name shown in the navigation control
    pub fn label(&self) -> &'static str {
        match self {
            NavMode::Overview => "Data Overview",
            NavMode::Eda => "EDA",
            NavMode::Visualizations => "Visualizations",
        }
    }

    /// File stem of the rendered page
    pub fn slug(&self) -> &'static str {
        match self {
            NavMode::Overview => "overview",
            NavMode::Eda => "eda",
            NavMode::Visualizations => "visualizations",
        }
    }
}

/// Current user inputs. Unset filter values fall back to the first option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub mode: NavMode,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
}

impl Selection {
    pub fn with_mode(&self, mode: NavMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }
}

/// A selection control and the option it currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectBox {
    pub label: String,
    pub options: Vec<String>,
    pub selected: String,
}

impl SelectBox {
    fn new(label: &str, options: Vec<String>, requested: Option<&str>) -> Self {
        let selected = match requested {
            Some(value) => {
                if !options.iter().any(|option| option == value) {
                    warn!(control = label, value, "selected value is not among the options");
                }
                value.to_string()
            }
            None => options.first().cloned().unwrap_or_default(),
        };
        Self {
            label: label.to_string(),
            options,
            selected,
        }
    }
}

/// Tabular widget with an optional header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_customers(table: &CustomerTable) -> Self {
        Self {
            columns: table.column_names(),
            rows: table.rows(),
        }
    }

    /// Statistic name / value table for one column
    pub fn from_describe(column: &str, summary: &stats::Describe) -> Self {
        Self {
            columns: vec![String::new(), column.to_string()],
            rows: summary
                .entries()
                .iter()
                .map(|(name, value)| vec![name.to_string(), format_number(*value)])
                .collect(),
        }
    }
}

/// Six decimals, integers without a fraction, NaN spelled out
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.6}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Header(String),
    Subheader(String),
    Text(String),
    /// Bold lead-in line
    Strong(String),
    /// Numbered list
    List(Vec<String>),
    Table(Table),
    /// Side-by-side columns
    Columns(Vec<Vec<Widget>>),
    Chart(Chart),
}

/// One fully evaluated view
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: String,
    pub mode: NavMode,
    /// Filter controls shown in the sidebar
    pub controls: Vec<SelectBox>,
    pub widgets: Vec<Widget>,
}

impl Page {
    fn new(mode: NavMode) -> Self {
        Self {
            title: DASHBOARD_TITLE.to_string(),
            mode,
            controls: Vec::new(),
            widgets: Vec::new(),
        }
    }

    fn push(&mut self, widget: Widget) -> &mut Self {
        self.widgets.push(widget);
        self
    }

    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        fn walk<'a>(widgets: &'a [Widget], out: &mut Vec<&'a Chart>) {
            for widget in widgets {
                match widget {
                    Widget::Chart(chart) => out.push(chart),
                    Widget::Columns(columns) => {
                        for column in columns {
                            walk(column, out);
                        }
                    }
                    _ => {}
                }
            }
        }
        let mut charts = Vec::new();
        walk(&self.widgets, &mut charts);
        charts.into_iter()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.widgets.iter().filter_map(|widget| match widget {
            Widget::Table(table) => Some(table),
            _ => None,
        })
    }
}

fn text(s: impl Into<String>) -> Widget {
    Widget::Text(s.into())
}

/// The dashboard over one loaded table
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    table: &'a CustomerTable,
    head_rows: usize,
}

impl<'a> Dashboard<'a> {
    pub fn new(table: &'a CustomerTable) -> Self {
        Self {
            table,
            head_rows: DEFAULT_HEAD_ROWS,
        }
    }

    pub fn with_head_rows(mut self, head_rows: usize) -> Self {
        self.head_rows = head_rows;
        self
    }

    /// Evaluate the view chosen by `selection`
    ///
    /// # Arguments
    /// * `selection` - Navigation mode plus the Gender and Marital_Status
    ///   choices; the filters only matter for the Visualizations view
    ///
    /// # Returns
    /// * The page for that mode, or the first error raised while building it
    pub fn render(&self, selection: &Selection) -> crate::Result<Page> {
        debug!(mode = selection.mode.label(), "rendering page");
        match selection.mode {
            NavMode::Overview => self.build_overview(),
            NavMode::Eda => self.build_eda(),
            NavMode::Visualizations => self.build_visualizations(
                selection.gender.as_deref(),
                selection.marital_status.as_deref(),
            ),
        }
    }

    /// Data Overview page
    ///
    /// # Returns
    /// * The first `head_rows` rows, then a describe table for every numeric
    ///   column laid out three per row
    pub fn build_overview(&self) -> crate::Result<Page> {
        let mut page = Page::new(NavMode::Overview);
        page.push(Widget::Header("Data Overview :".to_string()))
            .push(text(
                "This dataset provides information about credit card across different customer \
                 behavior.",
            ))
            .push(Widget::Table(Table::from_customers(&self.table.head(self.head_rows))))
            .push(Widget::Subheader("Numeric DataSet Summary :".to_string()))
            .push(text(
                "This Summary provides information about the measures of center and measures of \
                 spread for the numeric columns.",
            ));

        let numeric = self.table.numeric_columns();
        for chunk in numeric.chunks(STATS_PER_ROW) {
            let mut columns = Vec::with_capacity(chunk.len());
            for name in chunk {
                let summary = stats::describe(&self.table.numeric_column(name)?)?;
                columns.push(vec![
                    text(format!("Describe for: {name}")),
                    Widget::Table(Table::from_describe(name, &summary)),
                ]);
            }
            page.push(Widget::Columns(columns));
        }
        Ok(page)
    }

    /// EDA page
    ///
    /// # Returns
    /// * Unique, missing and duplicate counts of Education_Level, then the age
    ///   histogram by attrition, transaction totals per marital status and the
    ///   utilization box plot per education level
    pub fn build_eda(&self) -> crate::Result<Page> {
        let table = self.table;
        table.require_columns(&[
            EDUCATION_LEVEL,
            ATTRITION_FLAG,
            CUSTOMER_AGE,
            MARITAL_STATUS,
            TOTAL_TRANS_AMT,
            AVG_UTILIZATION_RATIO,
        ])?;
        let mut page = Page::new(NavMode::Eda);
        page.push(Widget::Header("Exploratory Data Analysis :".to_string()))
            .push(text(
                "One of the first things to do after loading a dataset is to explore it. A few \
                 quick counts already tell a lot about a column. Lets explore the Education_Level \
                 column of the credit card dataset :",
            ));

        let nominal = stats::summarize_nominal(table.frame(), EDUCATION_LEVEL)?;
        page.push(Widget::Table(Table {
            columns: vec![
                "Value_Count_Unique".to_string(),
                "Null_Count".to_string(),
                "Duplicate_Count".to_string(),
            ],
            rows: vec![vec![
                nominal.unique_count.to_string(),
                nominal.null_count.to_string(),
                nominal.duplicate_count.to_string(),
            ]],
        }));

        page.push(Widget::Subheader("Customer_Age Category Distribution".to_string()))
            .push(Widget::Chart(Chart::Histogram(HistogramChart {
                title: "Customer_Age by Attrition_Flag".to_string(),
                x_label: CUSTOMER_AGE.to_string(),
                groups: self.groups_by_flag(CUSTOMER_AGE)?,
                bins: HISTOGRAM_BINS,
                kde: true,
                rug: false,
                opacity: HISTOGRAM_OPACITY,
            })));

        let totals = stats::group_sums(table.frame(), MARITAL_STATUS, TOTAL_TRANS_AMT)?;
        page.push(Widget::Subheader(
            "Total Transaction Amount Distribution by Marital_Status".to_string(),
        ))
        .push(Widget::Chart(Chart::Bar(BarChart {
            title: "Transaction Amount across Marital_Status".to_string(),
            x_label: MARITAL_STATUS.to_string(),
            y_label: TOTAL_TRANS_AMT.to_string(),
            bars: totals,
        })));

        let ratios = stats::group_values(table.frame(), EDUCATION_LEVEL, AVG_UTILIZATION_RATIO)?;
        page.push(Widget::Subheader("Avg Utilization Ratio by Education_Level".to_string()))
            .push(Widget::Chart(Chart::Box(BoxChart {
                title: "Avg Utilization Ratio across Education_Level".to_string(),
                x_label: "Education Level".to_string(),
                y_label: "Avg Utilization Ratio".to_string(),
                groups: ratios
                    .into_iter()
                    .map(|(level, values)| Group::new(level, values))
                    .collect(),
            })));
        Ok(page)
    }

    /// Visualizations page
    ///
    /// The subset table and the donut use the rows matching both filters. The
    /// churn histograms, the scatter plot and the correlation matrix always
    /// cover the whole table.
    ///
    /// # Arguments
    /// * `gender` - Selected Gender, defaulting to the first distinct value
    /// * `marital_status` - Selected Marital_Status, defaulting the same way
    ///
    /// # Returns
    /// * The page with both selection controls attached
    pub fn build_visualizations(
        &self,
        gender: Option<&str>,
        marital_status: Option<&str>,
    ) -> crate::Result<Page> {
        let table = self.table;
        let gender_box = SelectBox::new("Select Gender :", table.distinct_values(GENDER)?, gender);
        let marital_box = SelectBox::new(
            "Select Marital Status :",
            table.distinct_values(MARITAL_STATUS)?,
            marital_status,
        );

        table.require_columns(&[
            ATTRITION_FLAG,
            AVG_UTILIZATION_RATIO,
            TOTAL_RELATIONSHIP_COUNT,
            TOTAL_TRANS_AMT,
            CREDIT_LIMIT,
        ])?;

        let filtered = table.filter_by(&gender_box.selected, &marital_box.selected)?;
        let labels = filtered.gender_attrition_labels()?;
        let split = insights::attrition_split(&filtered)?;

        let mut page = Page::new(NavMode::Visualizations);
        page.push(Widget::Header("Interactive Visualizations".to_string()))
            .push(text(format!(
                "Showing data for Gender: {} and Marital Status: {}",
                gender_box.selected, marital_box.selected
            )))
            .push(Widget::Table(Table::from_customers(&filtered)));

        page.push(Widget::Subheader(
            "Gender Distribution Split by Attrition Flag :".to_string(),
        ))
        .push(text(selection_summary(
            &gender_box.selected,
            &marital_box.selected,
            split,
        )))
        .push(text(
            "Note: You can apply filters to analyze specific customer segments based on gender, \
             marital status.",
        ))
        .push(Widget::Chart(Chart::Donut(DonutChart {
            title: "Combined Gender and Attrition Distribution".to_string(),
            slices: stats::proportions(&labels)?,
            hole: DONUT_HOLE,
        })));

        let utilization =
            insights::churn_share_in_range(table, AVG_UTILIZATION_RATIO, LOW_UTILIZATION)?;
        page.push(Widget::Subheader("Total Utilization Ratio VS Attrition Flag :".to_string()))
            .push(Widget::Strong("Utilization Ratio Insight :".to_string()))
            .push(text(format!(
                "Customers with a lower average utilization ratio demonstrate a significantly \
                 higher likelihood of churning their credit cards. Within the utilization range of \
                 2.4% to 7.4%, we observed that {} of all churned customers fall into this \
                 category. This suggests that limited engagement with credit card usage may be a \
                 strong indicator of potential attrition.",
                insights::format_share(utilization)
            )))
            .push(self.churn_histogram(AVG_UTILIZATION_RATIO)?)
            .push(Widget::Strong("Strategic Recommendation :".to_string()))
            .push(Widget::List(vec![
                "Identify customers with low utilization patterns in early stages.".to_string(),
                "Implement targeted engagement strategies, such as personalized \
                 offers, cashback incentives, or educational content that encourages \
                 higher card usage.".to_string(),
                "Use predictive models to flag underutilized accounts likely to \
                 churn, enabling timely interventions.".to_string(),
                "Run communication campaigns for low-spending customers to encourage \
                 usage and reduce churn risk.".to_string(),
            ]));

        let products =
            insights::churn_share_in_range(table, TOTAL_RELATIONSHIP_COUNT, FEW_PRODUCTS)?;
        page.push(Widget::Subheader("Total Relationship Count VS Attrition Flag :".to_string()))
            .push(Widget::Strong("Relationship Products Insight :".to_string()))
            .push(text(format!(
                "Customers with a lower Relationship Count (fewer bank products/services such as \
                 loans or savings accounts) demonstrate a significantly higher likelihood of \
                 churning their credit cards. When the Relationship Count is less than 3, {} of \
                 all churned customers fall into this segment. This suggests that limited product \
                 engagement is a strong indicator of potential attrition.",
                insights::format_share(products)
            )))
            .push(self.churn_histogram(TOTAL_RELATIONSHIP_COUNT)?)
            .push(Widget::Strong("Strategic Recommendation:".to_string()))
            .push(Widget::List(vec![
                "Encourage customers to open additional accounts or use more services \
                 such as loans and savings.".to_string(),
                "Offer investment products to strengthen overall engagement, foster \
                 loyalty, and reduce the likelihood of credit card attrition.".to_string(),
            ]));

        let spend = insights::churn_share_in_range(table, TOTAL_TRANS_AMT, LOW_SPEND)?;
        page.push(Widget::Subheader("Total Transaction Amount VS Attrition Flag :".to_string()))
            .push(Widget::Strong("Total Transaction Amount Insight :".to_string()))
            .push(text(format!(
                "Customers with lower total transaction amounts demonstrate a significantly higher \
                 likelihood of churning their credit cards. Within the transaction range of 1$ to \
                 2999$, {} of all churned customers fall into this category. This trend suggests \
                 that limited credit card usage is a strong indicator of potential attrition.",
                insights::format_share(spend)
            )))
            .push(self.churn_histogram(TOTAL_TRANS_AMT)?);

        page.push(Widget::Subheader(
            "Relationship between Total Transaction Amount and Credit Limit :".to_string(),
        ))
        .push(Widget::Chart(Chart::Scatter(ScatterChart {
            title: "Scatter Plot : Total Transaction Amount VS Credit Limit".to_string(),
            x_label: "Credit Limit".to_string(),
            y_label: "Total Transaction Amount".to_string(),
            groups: self.points_by_flag(CREDIT_LIMIT, TOTAL_TRANS_AMT)?,
        })));

        page.push(Widget::Subheader(
            "Correlation Matrix Between All Numeric Columns :".to_string(),
        ))
        .push(Widget::Chart(Chart::Heatmap(HeatmapChart {
            title: "Correlation Matrix".to_string(),
            matrix: self.correlations()?,
        })));

        page.controls = vec![gender_box, marital_box];
        Ok(page)
    }

    /// Pearson correlations between numeric columns
    ///
    /// # Returns
    /// * Matrix over every integer and float column in file order, except the
    ///   two Naive Bayes classifier outputs when the file carries them
    pub fn correlations(&self) -> crate::Result<stats::CorrelationMatrix> {
        let names: Vec<String> = self
            .table
            .numeric_columns()
            .into_iter()
            .filter(|name| !CORRELATION_EXCLUDED.contains(&name.as_str()))
            .collect();
        let numeric = self.table.frame().select(names)?;
        Ok(stats::correlation_matrix(&numeric)?)
    }

    fn groups_by_flag(&self, column: &str) -> crate::Result<Vec<Group>> {
        let grouped = stats::group_values(self.table.frame(), ATTRITION_FLAG, column)?;
        Ok(grouped
            .into_iter()
            .map(|(flag, values)| Group::new(flag, values))
            .collect())
    }

    fn churn_histogram(&self, column: &str) -> crate::Result<Widget> {
        Ok(Widget::Chart(Chart::Histogram(HistogramChart {
            title: format!("{column} by {ATTRITION_FLAG}"),
            x_label: column.to_string(),
            groups: self.groups_by_flag(column)?,
            bins: HISTOGRAM_BINS,
            kde: false,
            rug: true,
            opacity: HISTOGRAM_OPACITY,
        })))
    }

    fn points_by_flag(&self, x: &str, y: &str) -> crate::Result<Vec<PointGroup>> {
        let grouped = stats::group_points(self.table.frame(), ATTRITION_FLAG, x, y)?;
        Ok(grouped
            .into_iter()
            .map(|(name, points)| PointGroup { name, points })
            .collect())
    }
}

fn selection_summary(
    gender: &str,
    marital_status: &str,
    split: Option<insights::AttritionSplit>,
) -> String {
    match split {
        Some(split) => format!(
            "{} of {} {} customers with gender {} are Existing Customers, indicating continued \
             engagement with their credit cards. Conversely, {} are Attrited Customers, suggesting \
             they have discontinued their credit card usage.",
            insights::format_share(Some(split.existing)),
            split.customers,
            marital_status.to_lowercase(),
            gender,
            insights::format_share(Some(split.attrited)),
        ),
        None => format!(
            "No customers match Gender: {gender} and Marital Status: {marital_status}."
        ),
    }
}
