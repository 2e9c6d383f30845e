//! Customer table loading, column access and filtering using Polars

use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::DashboardError;

pub const ATTRITION_FLAG: &str = "Attrition_Flag";
pub const GENDER: &str = "Gender";
pub const MARITAL_STATUS: &str = "Marital_Status";
pub const EDUCATION_LEVEL: &str = "Education_Level";
pub const CUSTOMER_AGE: &str = "Customer_Age";
pub const CREDIT_LIMIT: &str = "Credit_Limit";
pub const TOTAL_TRANS_AMT: &str = "Total_Trans_Amt";
pub const TOTAL_RELATIONSHIP_COUNT: &str = "Total_Relationship_Count";
pub const AVG_UTILIZATION_RATIO: &str = "Avg_Utilization_Ratio";

/// Derived label column: Gender and Attrition_Flag joined by [`LABEL_SEPARATOR`]
pub const GENDER_ATTRITION: &str = "Gender_Attrition";
pub const LABEL_SEPARATOR: &str = " - ";

pub const ATTRITED_CUSTOMER: &str = "Attrited Customer";
pub const EXISTING_CUSTOMER: &str = "Existing Customer";

/// Columns the dashboard reads; the table is unusable without them
pub const REQUIRED_COLUMNS: [&str; 9] = [
    ATTRITION_FLAG,
    CUSTOMER_AGE,
    GENDER,
    EDUCATION_LEVEL,
    MARITAL_STATUS,
    CREDIT_LIMIT,
    TOTAL_TRANS_AMT,
    TOTAL_RELATIONSHIP_COUNT,
    AVG_UTILIZATION_RATIO,
];

/// Classifier outputs shipped with the dataset, left out of the correlation matrix
pub const CORRELATION_EXCLUDED: [&str; 2] = [
    "Naive_Bayes_Classifier_Attrition_Flag_Card_Category_Contacts_Count_12_mon_Dependent_count_Education_Level_Months_Inactive_12_mon_2",
    "Naive_Bayes_Classifier_Attrition_Flag_Card_Category_Contacts_Count_12_mon_Dependent_count_Education_Level_Months_Inactive_12_mon_1",
];

/// The loaded customer records. Never mutated; filters return new tables.
#[derive(Debug, Clone)]
pub struct CustomerTable {
    df: DataFrame,
}

impl CustomerTable {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Column names in file order
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// Fail with the first of `names` that the table does not have
    pub fn require_columns(&self, names: &[&str]) -> Result<(), DashboardError> {
        match names.iter().find(|name| !self.has_column(name)) {
            Some(missing) => Err(DashboardError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    fn series(&self, name: &str) -> Result<&Series, DashboardError> {
        self.df
            .column(name)
            .map(|column| column.as_materialized_series())
            .map_err(|_| DashboardError::MissingColumn(name.to_string()))
    }

    pub fn is_numeric(&self, name: &str) -> Result<bool, DashboardError> {
        let dtype = self.series(name)?.dtype();
        Ok(dtype.is_integer() || dtype.is_float())
    }

    /// Names of the integer and floating point columns, in file order
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|column| {
                let dtype = column.dtype();
                dtype.is_integer() || dtype.is_float()
            })
            .map(|column| column.name().to_string())
            .collect()
    }

    /// A column cast to `Float64`, row-aligned with the table
    pub fn numeric_column(&self, name: &str) -> Result<Float64Chunked, DashboardError> {
        let cast = self.series(name)?.cast(&DataType::Float64)?;
        Ok(cast.f64()?.clone())
    }

    /// Row-aligned values of a column rendered as text, `None` for missing entries
    pub fn text_values(&self, name: &str) -> Result<Vec<Option<String>>, DashboardError> {
        let cast = self.series(name)?.cast(&DataType::String)?;
        Ok(cast
            .str()?
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect())
    }

    /// Distinct non-missing values of a column in first-appearance order
    ///
    /// # Arguments
    /// * `name` - Column to read; values of any type are rendered as text
    ///
    /// # Returns
    /// * The values as offered by a selection control, so they can be passed
    ///   back to [`CustomerTable::filter_by`]
    pub fn distinct_values(&self, name: &str) -> Result<Vec<String>, DashboardError> {
        self.series(name)?;
        let unique = self
            .df
            .clone()
            .lazy()
            .select([col(name).cast(DataType::String).drop_nulls().unique_stable()])
            .collect()?;

        let values = unique.column(name)?.as_materialized_series().str()?.clone();
        let options = values.into_iter().flatten().map(str::to_string).collect();
        Ok(options)
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> CustomerTable {
        Self::new(self.df.head(Some(n)))
    }

    /// Rows where `Gender == gender` and `Marital_Status == marital_status`
    ///
    /// Both columns are compared as text, matching the options produced by
    /// [`CustomerTable::distinct_values`] whatever dtype the CSV reader inferred.
    ///
    /// # Arguments
    /// * `gender` - Selected Gender value
    /// * `marital_status` - Selected Marital_Status value
    ///
    /// # Returns
    /// * A new table; empty when the combination is absent
    pub fn filter_by(
        &self,
        gender: &str,
        marital_status: &str,
    ) -> Result<CustomerTable, DashboardError> {
        self.require_columns(&[GENDER, MARITAL_STATUS])?;

        let filtered = self
            .df
            .clone()
            .lazy()
            .filter(
                col(GENDER)
                    .cast(DataType::String)
                    .eq(lit(gender))
                    .and(col(MARITAL_STATUS).cast(DataType::String).eq(lit(marital_status))),
            )
            .collect()?;

        debug!(
            gender,
            marital_status,
            rows = filtered.height(),
            "filtered customer table"
        );
        Ok(Self::new(filtered))
    }

    /// `Gender - Attrition_Flag` for every row; missing parts render as empty text
    pub fn gender_attrition_labels(&self) -> Result<Vec<String>, DashboardError> {
        let genders = self.text_values(GENDER)?;
        let flags = self.text_values(ATTRITION_FLAG)?;

        Ok(genders
            .into_iter()
            .zip(flags)
            .map(|(gender, flag)| {
                format!(
                    "{}{}{}",
                    gender.unwrap_or_default(),
                    LABEL_SEPARATOR,
                    flag.unwrap_or_default()
                )
            })
            .collect())
    }

    /// Every cell rendered as display text, row by row
    pub fn rows(&self) -> Vec<Vec<String>> {
        let columns = self.df.get_columns();
        (0..self.df.height())
            .map(|row| {
                columns
                    .iter()
                    .map(|column| format_cell(column.as_materialized_series().get(row)))
                    .collect()
            })
            .collect()
    }
}

fn format_cell(value: PolarsResult<AnyValue<'_>>) -> String {
    match value {
        Ok(AnyValue::Null) | Err(_) => String::new(),
        Ok(AnyValue::String(text)) => text.to_string(),
        Ok(AnyValue::StringOwned(text)) => text.to_string(),
        Ok(other) => other.to_string(),
    }
}

/// Load the customer CSV file into a [`CustomerTable`]
///
/// # Arguments
/// * `file_path` - Path to a delimited file with a header row. Column types
///   are inferred from every row.
///
/// # Returns
/// * The table, or [`DashboardError::MissingInput`] when the file does not exist
pub fn load_customer_table(file_path: &Path) -> Result<CustomerTable, DashboardError> {
    if !file_path.is_file() {
        return Err(DashboardError::MissingInput(file_path.to_path_buf()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(file_path.to_path_buf()))?
        .finish()?;

    info!(
        path = %file_path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded customer table"
    );
    Ok(CustomerTable::new(df))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "CLIENTNUM,Attrition_Flag,Customer_Age,Gender,Education_Level,Marital_Status,Credit_Limit,Total_Trans_Amt,Total_Relationship_Count,Avg_Utilization_Ratio"
        )
        .unwrap();
        writeln!(
            file,
            "1,Existing Customer,45,M,High School,Married,12691.0,1144,5,0.061"
        )
        .unwrap();
        writeln!(file, "2,Existing Customer,49,F,Graduate,Single,8256.0,1291,6,0.105").unwrap();
        writeln!(file, "3,Attrited Customer,51,M,Graduate,Married,3418.0,1887,4,0.0").unwrap();
        writeln!(file, "4,Existing Customer,40,F,,Married,3313.0,1171,3,0.76").unwrap();
        writeln!(file, "5,Attrited Customer,40,M,Uneducated,Married,4716.0,816,5,0.0").unwrap();
        file
    }

    fn load_test_table() -> (NamedTempFile, CustomerTable) {
        let file = create_test_csv();
        let table = load_customer_table(file.path()).unwrap();
        (file, table)
    }

    #[test]
    fn test_load_customer_table() {
        let (_file, table) = load_test_table();
        assert_eq!(table.height(), 5);
        assert!(table.require_columns(&REQUIRED_COLUMNS).is_ok());
        assert_eq!(table.column_names()[1], ATTRITION_FLAG);
    }

    #[test]
    fn test_missing_input_file() {
        let result = load_customer_table(Path::new("does/not/exist.csv"));
        assert!(matches!(result, Err(DashboardError::MissingInput(_))));
    }

    #[test]
    fn test_require_columns_reports_missing_name() {
        let (_file, table) = load_test_table();
        match table.require_columns(&[GENDER, "Card_Category"]) {
            Err(DashboardError::MissingColumn(name)) => assert_eq!(name, "Card_Category"),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_columns_and_values() {
        let (_file, table) = load_test_table();
        let numeric = table.numeric_columns();
        assert!(numeric.contains(&CUSTOMER_AGE.to_string()));
        assert!(numeric.contains(&AVG_UTILIZATION_RATIO.to_string()));
        assert!(!numeric.contains(&GENDER.to_string()));

        let ages = table.numeric_column(CUSTOMER_AGE).unwrap();
        assert_eq!(ages.get(0), Some(45.0));
        assert!(matches!(
            table.numeric_column("Nope"),
            Err(DashboardError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_text_values_keep_missing_entries() {
        let (_file, table) = load_test_table();
        let education = table.text_values(EDUCATION_LEVEL).unwrap();
        assert_eq!(education.len(), 5);
        assert_eq!(education[3], None);
    }

    #[test]
    fn test_distinct_values_first_appearance_order() {
        let (_file, table) = load_test_table();
        assert_eq!(table.distinct_values(GENDER).unwrap(), vec!["M", "F"]);
        assert_eq!(
            table.distinct_values(MARITAL_STATUS).unwrap(),
            vec!["Married", "Single"]
        );
    }

    #[test]
    fn test_filter_by_matches_both_values() {
        let (_file, table) = load_test_table();
        let filtered = table.filter_by("M", "Married").unwrap();
        assert_eq!(filtered.height(), 3);

        let genders = filtered.text_values(GENDER).unwrap();
        let marital = filtered.text_values(MARITAL_STATUS).unwrap();
        assert!(genders.iter().all(|g| g.as_deref() == Some("M")));
        assert!(marital.iter().all(|m| m.as_deref() == Some("Married")));

        // Source table is untouched
        assert_eq!(table.height(), 5);
    }

    #[test]
    fn test_filter_by_absent_pair_is_empty() {
        let (_file, table) = load_test_table();
        let filtered = table.filter_by("M", "Single").unwrap();
        assert!(filtered.is_empty());
        assert!(filtered.rows().is_empty());
        assert!(filtered.gender_attrition_labels().unwrap().is_empty());
    }

    #[test]
    fn test_gender_attrition_labels() {
        let (_file, table) = load_test_table();
        let labels = table.gender_attrition_labels().unwrap();
        assert_eq!(labels[0], "M - Existing Customer");
        assert_eq!(labels[1], "F - Existing Customer");
        assert_eq!(labels[2], "M - Attrited Customer");
    }

    #[test]
    fn test_head_and_rows() {
        let (_file, table) = load_test_table();
        let head = table.head(2);
        let rows = head.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 10);
        assert_eq!(rows[0][1], "Existing Customer");
        assert_eq!(rows[0][3], "M");
    }

    #[test]
    fn test_filter_by_numeric_coded_columns() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Attrition_Flag,Gender,Marital_Status").unwrap();
        writeln!(file, "Existing Customer,1,2").unwrap();
        writeln!(file, "Attrited Customer,0,2").unwrap();
        writeln!(file, "Existing Customer,1,3").unwrap();
        writeln!(file, "Attrited Customer,1,2").unwrap();
        let table = load_customer_table(file.path()).unwrap();
        assert!(table.is_numeric(GENDER).unwrap());

        let genders = table.distinct_values(GENDER).unwrap();
        let statuses = table.distinct_values(MARITAL_STATUS).unwrap();
        assert_eq!(genders, vec!["1", "0"]);
        assert_eq!(statuses, vec!["2", "3"]);

        let filtered = table.filter_by(&genders[0], &statuses[0]).unwrap();
        assert_eq!(filtered.height(), 2);
        assert_eq!(
            filtered.gender_attrition_labels().unwrap(),
            vec!["1 - Existing Customer", "1 - Attrited Customer"]
        );
    }

    #[test]
    fn test_late_type_change_is_inferred_from_all_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Gender,Credit_Limit").unwrap();
        for _ in 0..200 {
            writeln!(file, "M,1000").unwrap();
        }
        writeln!(file, "F,1500.5").unwrap();
        let table = load_customer_table(file.path()).unwrap();

        let limits = table.numeric_column(CREDIT_LIMIT).unwrap();
        assert_eq!(limits.len(), 201);
        assert_eq!(limits.get(200), Some(1500.5));
    }
}
