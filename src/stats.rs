use crate::model::StatsPayload;

/// Label/value arrays for one bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub title: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl ChartSeries {
    pub fn max(&self) -> u64 {
        self.values.iter().copied().max().unwrap_or(0)
    }
}

fn count(n: i64) -> u64 {
    n.max(0) as u64
}

/// Shape each distribution present in the payload. Absent keys are skipped.
pub fn shape(payload: &StatsPayload) -> Vec<ChartSeries> {
    let mut series = Vec::new();
    if let Some(years) = &payload.year_distribution {
        series.push(ChartSeries {
            title: "Movies by decade",
            labels: years.iter().map(|b| b.decade.clone()).collect(),
            values: years.iter().map(|b| count(b.count)).collect(),
        });
    }
    if let Some(genres) = &payload.genre_distribution {
        series.push(ChartSeries {
            title: "Movies by genre",
            labels: genres.iter().map(|b| b.name.clone()).collect(),
            values: genres.iter().map(|b| count(b.count)).collect(),
        });
    }
    if let Some(ratings) = &payload.rating_distribution {
        series.push(ChartSeries {
            title: "Movies by rating",
            labels: ratings
                .iter()
                .map(|b| match &b.rating_group {
                    Some(g) if !g.is_blank() => format!("{g}+"),
                    _ => "?".to_string(),
                })
                .collect(),
            values: ratings.iter().map(|b| count(b.count)).collect(),
        });
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_full_payload() {
        let payload: StatsPayload = serde_json::from_str(
            r#"{
                "year_distribution": [{"decade": "1990s", "count": 40}, {"decade": "2000s", "count": 62}],
                "genre_distribution": [{"name": "剧情", "count": 180}],
                "rating_distribution": [{"rating_group": 8, "count": 120}, {"rating_group": "9", "count": 30}]
            }"#,
        )
        .unwrap();
        let series = shape(&payload);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].labels, vec!["1990s", "2000s"]);
        assert_eq!(series[0].values, vec![40, 62]);
        assert_eq!(series[0].max(), 62);
        assert_eq!(series[2].labels, vec!["8+", "9+"]);
    }

    #[test]
    fn test_missing_distribution_skips_chart() {
        let payload: StatsPayload =
            serde_json::from_str(r#"{"genre_distribution": [{"name": "喜剧", "count": 3}]}"#).unwrap();
        let series = shape(&payload);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].title, "Movies by genre");

        assert!(shape(&StatsPayload::default()).is_empty());
    }
}
