//! Formatted terminal output for cleaning and training runs.
//!
//! We keep formatting code in one place so:
//! - the cleaning/fitting code stays clean and testable
//! - output changes are localized

use crate::clean::StageCounts;
use crate::domain::ModelArtifact;

/// Format the per-stage removal counts of a cleaning run.
pub fn format_clean_summary(counts: &StageCounts) -> String {
    let mut out = String::new();

    out.push_str("=== propfit - listings cleaning ===\n");
    out.push_str(&format!("Rows in:                {}\n", counts.rows_in));
    if counts.columns_dropped.is_empty() {
        out.push_str("Columns dropped:        none\n");
    } else {
        out.push_str(&format!(
            "Columns dropped:        {} ({})\n",
            counts.columns_dropped.len(),
            counts.columns_dropped.join(", ")
        ));
    }
    out.push_str(&format!("Missing essentials:     -{}\n", counts.missing_essential));
    out.push_str(&format!("Invalid price/area:     -{}\n", counts.invalid_price_area));
    out.push_str(&format!("Duplicates:             -{}\n", counts.duplicates));
    out.push_str(&format!("Price outliers:         -{}\n", counts.price_outliers));
    out.push_str(&format!("Area outliers:          -{}\n", counts.area_outliers));
    out.push_str(&format!("Invalid bhk:            -{}\n", counts.invalid_bhk));
    out.push_str(&format!("Rows out:               {}\n", counts.rows_out));

    out
}

/// Format the summary of a training run: feature space size + held-out metrics.
pub fn format_train_summary(artifact: &ModelArtifact, n_train: usize) -> String {
    let fs = &artifact.feature_space;
    let q = &artifact.quality;
    let mut out = String::new();

    out.push_str("=== propfit - price model training ===\n");
    out.push_str(&format!("As-of:                  {}\n", artifact.asof_date));
    out.push_str(&format!(
        "Feature space:          {} columns ({} base, {} locality, {} city, {} area-cat)\n",
        fs.len(),
        fs.base.len(),
        fs.locality_levels.len(),
        fs.city_levels.len(),
        fs.area_cat_levels.len()
    ));
    out.push_str(&format!("Train rows:             {n_train}\n"));
    out.push_str(&format!("Test rows:              {}\n", q.n_test));
    out.push_str(&format!("Ridge alpha:            {}\n", artifact.regressor.alpha));
    out.push_str(&format!("MAE:                    {:.0}\n", q.mae));
    out.push_str(&format!("RMSE:                   {:.0}\n", q.rmse));
    out.push_str(&format!("R2:                     {:.4}\n", q.r2));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_summary_mentions_dropped_columns() {
        let counts = StageCounts {
            rows_in: 10,
            columns_dropped: vec!["bath".into()],
            rows_out: 7,
            duplicates: 3,
            ..StageCounts::default()
        };
        let s = format_clean_summary(&counts);
        assert!(s.contains("bath"));
        assert!(s.contains("Rows out:               7"));
    }
}
