//! Descriptive statistics over customer columns
//!
//! Counting, grouping and quantiles run through Polars; the plot geometry
//! (histogram bins, KDE, box whiskers) is computed over plain `f64` slices.

use ndarray::Array2;
use polars::prelude::*;

/// Summary of a numeric column: count, center, spread and quartiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Describe {
    /// Number of non-missing values
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1)
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    fn empty() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            q50: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Statistic names paired with their values, in display order
    pub fn entries(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.q50),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Describe a numeric column, ignoring missing entries
///
/// # Arguments
/// * `values` - Column cast to `Float64`
///
/// # Returns
/// * Count of non-missing values, mean, sample standard deviation (NaN below
///   two values), min, linear quartiles and max. NaN everywhere for an empty column.
pub fn describe(values: &Float64Chunked) -> PolarsResult<Describe> {
    let count = values.len() - values.null_count();
    if count == 0 {
        return Ok(Describe::empty());
    }

    let quartile = |q: f64| -> PolarsResult<f64> {
        Ok(values
            .quantile(q, QuantileMethod::Linear)?
            .unwrap_or(f64::NAN))
    };
    let std = if count < 2 {
        f64::NAN
    } else {
        values.std(1).unwrap_or(f64::NAN)
    };

    Ok(Describe {
        count,
        mean: values.mean().unwrap_or(f64::NAN),
        std,
        min: values.min().unwrap_or(f64::NAN),
        q25: quartile(0.25)?,
        q50: quartile(0.5)?,
        q75: quartile(0.75)?,
        max: values.max().unwrap_or(f64::NAN),
    })
}

/// Uniqueness profile of a nominal column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NominalSummary {
    /// Distinct non-missing values
    pub unique_count: usize,
    /// Missing entries
    pub null_count: usize,
    /// Entries repeating an earlier entry (missing counts as a value)
    pub duplicate_count: usize,
}

/// Unique, missing and duplicate counts of one column of `frame`
pub fn summarize_nominal(frame: &DataFrame, column: &str) -> PolarsResult<NominalSummary> {
    let counts = frame
        .clone()
        .lazy()
        .select([
            col(column).drop_nulls().n_unique().alias("unique"),
            col(column).null_count().alias("nulls"),
            // n_unique counts null as one more value
            col(column).n_unique().alias("distinct"),
            len().alias("rows"),
        ])
        .collect()?;

    let rows = scalar_count(&counts, "rows")?;
    let distinct = scalar_count(&counts, "distinct")?;
    Ok(NominalSummary {
        unique_count: scalar_count(&counts, "unique")?,
        null_count: scalar_count(&counts, "nulls")?,
        duplicate_count: rows.saturating_sub(distinct),
    })
}

/// First value of an integer column of a one-row aggregate
pub(crate) fn scalar_count(frame: &DataFrame, name: &str) -> PolarsResult<usize> {
    let cast = frame
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;
    Ok(cast.u64()?.get(0).unwrap_or(0) as usize)
}

/// Pairwise Pearson correlations between named columns
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Square and symmetric, with ones on the diagonal
    pub values: Array2<f64>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[[row, col]]
    }
}

/// Correlation matrix over every column of `frame` using pairwise-complete rows
///
/// # Arguments
/// * `frame` - Numeric columns only; each is cast to `Float64`
///
/// # Returns
/// * Square symmetric matrix in column order with ones on the diagonal. Cells
///   with fewer than two complete pairs or a constant side are NaN.
pub fn correlation_matrix(frame: &DataFrame) -> PolarsResult<CorrelationMatrix> {
    let series = frame
        .get_columns()
        .iter()
        .map(|column| column.as_materialized_series().cast(&DataType::Float64))
        .collect::<PolarsResult<Vec<Series>>>()?;
    let columns = series
        .iter()
        .map(|s| s.f64())
        .collect::<PolarsResult<Vec<&Float64Chunked>>>()?;

    let n = columns.len();
    let mut values = Array2::<f64>::eye(n);
    for i in 0..n {
        for j in (i + 1)..n {
            let r = pearson(columns[i], columns[j]);
            values[[i, j]] = r;
            values[[j, i]] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: series.iter().map(|s| s.name().to_string()).collect(),
        values,
    })
}

/// Pearson coefficient over rows where both sides are present
fn pearson(x: &Float64Chunked, y: &Float64Chunked) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .into_iter()
        .zip(y)
        .filter_map(|(a, b)| Some((a?, b?)))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (covariance / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Equal-width bin counts shared by several series
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending edges
    pub edges: Vec<f64>,
    /// One count vector per input series
    pub counts: Vec<Vec<usize>>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Bin every series over the global range; `None` when there are no values at all.
/// The last bin is closed on the right.
pub fn histogram(series: &[&[f64]], bins: usize) -> Option<Histogram> {
    let bins = bins.max(1);
    let (mut lo, mut hi) = series
        .iter()
        .flat_map(|values| values.iter())
        .fold(None, |range: Option<(f64, f64)>, &v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
    let counts = series
        .iter()
        .map(|values| {
            let mut counts = vec![0; bins];
            for &v in values.iter() {
                let bin = (((v - lo) / width).floor() as usize).min(bins - 1);
                counts[bin] += 1;
            }
            counts
        })
        .collect();

    Some(Histogram { edges, counts })
}

/// Gaussian kernel density at each grid point, bandwidth by Scott's rule.
/// Empty when the sample is too small or constant.
pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return Vec::new();
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt();
    if std == 0.0 {
        return Vec::new();
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    grid.iter()
        .map(|&x| {
            norm * values
                .iter()
                .map(|&v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
        })
        .collect()
}

/// Quantile of sorted values with linear interpolation between closest ranks
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Box plot geometry
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Most extreme values within 1.5 IQR of the box
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let reach = 1.5 * (q3 - q1);
    let (low_fence, high_fence) = (q1 - reach, q3 + reach);

    let inside = || sorted.iter().copied().filter(|v| *v >= low_fence && *v <= high_fence);
    let lower_whisker = inside().next().unwrap_or(q1);
    let upper_whisker = inside().last().unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Share of one label among all labels
#[derive(Debug, Clone, PartialEq)]
pub struct Proportion {
    pub label: String,
    pub count: usize,
    pub share: f64,
}

/// Label shares in first-appearance order
pub fn proportions(labels: &[String]) -> PolarsResult<Vec<Proportion>> {
    if labels.is_empty() {
        return Ok(Vec::new());
    }

    let frame = DataFrame::new(vec![Series::new("label".into(), labels).into()])?;
    let counts = frame
        .lazy()
        .group_by_stable([col("label")])
        .agg([len().alias("count")])
        .collect()?;

    let names = counts.column("label")?.as_materialized_series().str()?.clone();
    let sizes = counts
        .column("count")?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;
    let total = labels.len() as f64;

    let shares = names
        .into_iter()
        .zip(sizes.u64()?)
        .map(|(label, count)| {
            let count = count.unwrap_or(0) as usize;
            Proportion {
                label: label.unwrap_or_default().to_string(),
                count,
                share: count as f64 / total,
            }
        })
        .collect();
    Ok(shares)
}

/// Sum of `value` per distinct `key`, groups in first-appearance order.
/// Rows with a missing key are skipped.
pub fn group_sums(
    frame: &DataFrame,
    key: &str,
    value: &str,
) -> PolarsResult<Vec<(String, f64)>> {
    let grouped = frame
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by_stable([col(key).cast(DataType::String)])
        .agg([col(value).cast(DataType::Float64).sum()])
        .collect()?;

    let keys = grouped.column(key)?.as_materialized_series().str()?.clone();
    let sums = grouped.column(value)?.as_materialized_series().f64()?.clone();
    let totals = keys
        .into_iter()
        .zip(&sums)
        .map(|(key, sum)| (key.unwrap_or_default().to_string(), sum.unwrap_or(0.0)))
        .collect();
    Ok(totals)
}

/// Present values of `value` grouped by `key`, groups in first-appearance order.
/// Rows missing either side are skipped.
pub fn group_values(
    frame: &DataFrame,
    key: &str,
    value: &str,
) -> PolarsResult<Vec<(String, Vec<f64>)>> {
    Ok(grouped_lists(frame, key, &[value])?
        .into_iter()
        .map(|(name, mut lists)| (name, lists.pop().unwrap_or_default()))
        .collect())
}

/// `(x, y)` pairs grouped by `key`; rows missing any of the three are skipped
pub fn group_points(
    frame: &DataFrame,
    key: &str,
    x: &str,
    y: &str,
) -> PolarsResult<Vec<(String, Vec<(f64, f64)>)>> {
    Ok(grouped_lists(frame, key, &[x, y])?
        .into_iter()
        .map(|(name, lists)| {
            let points = match lists.as_slice() {
                [xs, ys] => xs.iter().copied().zip(ys.iter().copied()).collect(),
                _ => Vec::new(),
            };
            (name, points)
        })
        .collect())
}

/// One list of `values` columns per distinct key, keeping only complete rows
fn grouped_lists(
    frame: &DataFrame,
    key: &str,
    values: &[&str],
) -> PolarsResult<Vec<(String, Vec<Vec<f64>>)>> {
    let complete = values
        .iter()
        .fold(col(key).is_not_null(), |acc, name| acc.and(col(*name).is_not_null()));
    let grouped = frame
        .clone()
        .lazy()
        .filter(complete)
        .group_by_stable([col(key).cast(DataType::String)])
        .agg(
            values
                .iter()
                .map(|name| col(*name).cast(DataType::Float64))
                .collect::<Vec<_>>(),
        )
        .collect()?;

    let keys = grouped.column(key)?.as_materialized_series().str()?.clone();
    let mut lists: Vec<Vec<Vec<f64>>> = vec![Vec::new(); grouped.height()];
    for name in values {
        let column = grouped.column(name)?.as_materialized_series().list()?.clone();
        for (slot, group) in lists.iter_mut().zip(&column) {
            let present = match group {
                Some(series) => series.f64()?.into_iter().flatten().collect(),
                None => Vec::new(),
            };
            slot.push(present);
        }
    }

    let groups = keys
        .into_iter()
        .map(|key| key.unwrap_or_default().to_string())
        .zip(lists)
        .collect();
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn column(values: &[Option<f64>]) -> Float64Chunked {
        Float64Chunked::from_slice_options("v".into(), values)
    }

    #[test]
    fn test_describe_counts_present_values() {
        let values = column(&[Some(1.0), None, Some(2.0), Some(3.0), Some(4.0), None]);
        let summary = describe(&values).unwrap();
        assert_eq!(summary.count, 4);
        assert!(approx(summary.mean, 2.5));
        assert!(approx(summary.std, (5.0f64 / 3.0).sqrt()));
        assert!(approx(summary.min, 1.0));
        assert!(approx(summary.q25, 1.75));
        assert!(approx(summary.q50, 2.5));
        assert!(approx(summary.q75, 3.25));
        assert!(approx(summary.max, 4.0));
    }

    #[test]
    fn test_describe_degenerate_inputs() {
        let empty = describe(&column(&[None, None])).unwrap();
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());

        let single = describe(&column(&[Some(7.0)])).unwrap();
        assert_eq!(single.count, 1);
        assert!(single.std.is_nan());
        assert!(approx(single.q75, 7.0));
    }

    #[test]
    fn test_summarize_nominal() {
        let frame = df!(
            "level" => [
                Some("Graduate"),
                Some("High School"),
                Some("Graduate"),
                None,
                None,
                Some("Doctorate"),
            ]
        )
        .unwrap();

        let summary = summarize_nominal(&frame, "level").unwrap();
        assert_eq!(summary.unique_count, 3);
        assert_eq!(summary.null_count, 2);
        // Second "Graduate" and second missing entry
        assert_eq!(summary.duplicate_count, 2);
    }

    #[test]
    fn test_summarize_nominal_empty_and_missing_column() {
        let frame = df!("level" => Vec::<Option<&str>>::new()).unwrap();
        let summary = summarize_nominal(&frame, "level").unwrap();
        assert_eq!(summary, NominalSummary { unique_count: 0, null_count: 0, duplicate_count: 0 });
        assert!(summarize_nominal(&frame, "other").is_err());
    }

    #[test]
    fn test_correlation_matrix_shape() {
        let frame = df!(
            "a" => [Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
            "b" => [Some(2), Some(4), Some(6), Some(8)],
            "c" => [Some(4.0), Some(3.0), None, Some(1.0)]
        )
        .unwrap();
        let matrix = correlation_matrix(&frame).unwrap();

        assert_eq!(matrix.columns, vec!["a", "b", "c"]);
        assert_eq!(matrix.values.shape(), &[3, 3]);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
        assert!(approx(matrix.get(0, 1), 1.0));
        assert!(matrix.get(0, 2) < -0.9);
    }

    #[test]
    fn test_correlation_of_constant_column_is_nan() {
        let frame = df!("a" => [1.0, 2.0, 3.0], "flat" => [5.0, 5.0, 5.0]).unwrap();
        let matrix = correlation_matrix(&frame).unwrap();
        assert!(matrix.get(0, 1).is_nan());
        assert_eq!(matrix.get(1, 1), 1.0);
    }

    #[test]
    fn test_histogram_shared_bins() {
        let a = [0.0, 1.0, 2.0, 10.0];
        let b = [5.0, 5.0];
        let hist = histogram(&[&a, &b], 5).unwrap();

        assert_eq!(hist.edges.len(), 6);
        assert!(approx(hist.bin_width(), 2.0));
        assert_eq!(hist.counts[0], vec![2, 1, 0, 0, 1]);
        assert_eq!(hist.counts[1], vec![0, 0, 2, 0, 0]);
        assert_eq!(hist.max_count(), 2);
    }

    #[test]
    fn test_histogram_empty_and_constant() {
        assert!(histogram(&[&[]], 25).is_none());

        let hist = histogram(&[&[3.0, 3.0]], 4).unwrap();
        assert!(approx(hist.edges[0], 2.5));
        assert_eq!(hist.counts[0].iter().sum::<usize>(), 2);
    }

    #[test]
    fn test_gaussian_kde_integrates_to_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0];
        let grid: Vec<f64> = (0..=1000).map(|i| -5.0 + i as f64 * 0.015).collect();
        let density = gaussian_kde(&values, &grid);
        let area: f64 = density.iter().sum::<f64>() * 0.015;
        assert!((area - 1.0).abs() < 0.01);

        assert!(gaussian_kde(&[1.0], &grid).is_empty());
        assert!(gaussian_kde(&[2.0, 2.0], &grid).is_empty());
    }

    #[test]
    fn test_box_stats_whiskers_and_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = box_stats(&values).unwrap();
        assert!(approx(stats.median, 3.5));
        assert!(approx(stats.lower_whisker, 1.0));
        assert!(approx(stats.upper_whisker, 5.0));
        assert_eq!(stats.outliers, vec![100.0]);
        assert!(box_stats(&[]).is_none());
    }

    #[test]
    fn test_proportions_first_appearance_order() {
        let labels: Vec<String> = ["x", "y", "x", "x"].iter().map(|s| s.to_string()).collect();
        let shares = proportions(&labels).unwrap();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].label, "x");
        assert_eq!(shares[0].count, 3);
        assert!(approx(shares[0].share, 0.75));
        assert_eq!(shares[1].label, "y");
        assert!(approx(shares[1].share, 0.25));
        assert!(proportions(&[]).unwrap().is_empty());
    }

    fn grouped_frame() -> DataFrame {
        df!(
            "key" => [Some("b"), None, Some("a"), Some("b"), Some("a")],
            "x" => [Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)],
            "y" => [Some(10), Some(20), Some(30), None, Some(50)]
        )
        .unwrap()
    }

    #[test]
    fn test_group_values_skips_missing() {
        let groups = group_values(&grouped_frame(), "key", "x").unwrap();
        assert_eq!(
            groups,
            vec![("b".to_string(), vec![1.0, 3.0]), ("a".to_string(), vec![4.0])]
        );
    }

    #[test]
    fn test_group_sums_in_first_appearance_order() {
        let sums = group_sums(&grouped_frame(), "key", "y").unwrap();
        assert_eq!(sums, vec![("b".to_string(), 10.0), ("a".to_string(), 80.0)]);
    }

    #[test]
    fn test_group_points_need_both_coordinates() {
        let points = group_points(&grouped_frame(), "key", "x", "y").unwrap();
        assert_eq!(
            points,
            vec![("b".to_string(), vec![(1.0, 10.0)]), ("a".to_string(), vec![(4.0, 50.0)])]
        );
    }
}
