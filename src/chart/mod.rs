//! Chart configuration builder
//!
//! Maps a dataset's visualization descriptor plus its tabular payload to
//! a Chart.js-shaped configuration object. This is a pure computation;
//! handing the configuration to an actual canvas is the embedding page's
//! concern.

use miette::Diagnostic;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::model::{ChartType, Dataset};

/// Default color palette, cycled when a chart needs more series than
/// configured colors
pub const DEFAULT_COLORS: [&str; 12] = [
    "#2C5F2D", "#97BC62", "#F4A261", "#264653", "#28A745", "#FFC107", "#DC3545", "#17A2B8",
    "#6F42C1", "#E83E8C", "#20C997", "#FD7E14",
];

/// Errors raised while building a chart configuration
#[derive(Debug, Error, Diagnostic)]
pub enum ChartError {
    #[error("dataset has no visualization section")]
    #[diagnostic(code(plaza::chart::missing_visualization))]
    MissingVisualization,

    #[error("chart data must be a non-empty array of records")]
    #[diagnostic(code(plaza::chart::non_tabular))]
    NonTabularData,

    #[error("no chart rendering for visualization type: {0}")]
    #[diagnostic(
        code(plaza::chart::unsupported),
        help("map, table, and heatmap datasets are rendered by dedicated widgets")
    )]
    UnsupportedType(ChartType),
}

/// Build a chart configuration from a dataset
pub fn build_chart_config(dataset: &Dataset) -> Result<Value, ChartError> {
    let viz = dataset
        .visualization
        .as_ref()
        .ok_or(ChartError::MissingVisualization)?;

    let rows = tabular_rows(&dataset.data)?;
    let config = &viz.config;

    match viz.chart_type {
        ChartType::Bar => Ok(axis_chart("bar", &rows, config, false)),
        ChartType::Line => Ok(axis_chart("line", &rows, config, false)),
        ChartType::Area => Ok(axis_chart("line", &rows, config, true)),
        ChartType::Pie => Ok(pie_chart("pie", &rows, config)),
        ChartType::Doughnut => Ok(pie_chart("doughnut", &rows, config)),
        ChartType::Scatter => Ok(scatter_chart(&rows, config)),
        other @ (ChartType::Map | ChartType::Table | ChartType::Heatmap) => {
            Err(ChartError::UnsupportedType(other))
        }
    }
}

fn tabular_rows(data: &Value) -> Result<Vec<&Map<String, Value>>, ChartError> {
    let rows: Vec<&Map<String, Value>> = data
        .as_array()
        .ok_or(ChartError::NonTabularData)?
        .iter()
        .filter_map(Value::as_object)
        .collect();
    if rows.is_empty() {
        return Err(ChartError::NonTabularData);
    }
    Ok(rows)
}

fn config_str<'a>(config: &'a ChartConfig, key: &str) -> Option<&'a str> {
    config.get(key).and_then(Value::as_str)
}

/// Visualization config map, as carried on the dataset model
type ChartConfig = std::collections::BTreeMap<String, Value>;

fn config_flag(config: &ChartConfig, key: &str, default: bool) -> bool {
    config.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn config_colors(config: &ChartConfig) -> Vec<String> {
    config
        .get("colors")
        .and_then(Value::as_array)
        .map(|colors| {
            colors
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn color_at(configured: &[String], index: usize) -> String {
    configured
        .get(index)
        .cloned()
        .unwrap_or_else(|| DEFAULT_COLORS[index % DEFAULT_COLORS.len()].to_string())
}

/// Pick the label field: explicit config, a well-known candidate name,
/// the first string-valued field, or the first field
fn guess_label_field(sample: &Map<String, Value>, config: &ChartConfig) -> String {
    if let Some(field) = config_str(config, "labelField") {
        return field.to_string();
    }

    const CANDIDATES: &[&str] = &[
        "name", "label", "category", "distrito", "año", "mes", "fecha", "tipo",
    ];
    for candidate in CANDIDATES {
        if sample.contains_key(*candidate) {
            return (*candidate).to_string();
        }
    }

    for (key, value) in sample {
        if value.is_string() {
            return key.clone();
        }
    }

    sample.keys().next().cloned().unwrap_or_default()
}

/// Numeric fields other than the label field
fn guess_value_fields(sample: &Map<String, Value>, label_field: &str, config: &ChartConfig) -> Vec<String> {
    if let Some(fields) = config.get("valueFields").and_then(Value::as_array) {
        return fields
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
    }
    if let Some(field) = config_str(config, "valueField") {
        return vec![field.to_string()];
    }

    sample
        .iter()
        .filter(|(key, value)| key.as_str() != label_field && value.is_number())
        .map(|(key, _)| key.clone())
        .collect()
}

fn labels(rows: &[&Map<String, Value>], label_field: &str) -> Vec<Value> {
    rows.iter()
        .map(|row| match row.get(label_field) {
            Some(Value::String(text)) => json!(text),
            Some(Value::Number(number)) => json!(number.to_string()),
            _ => json!(""),
        })
        .collect()
}

fn series(rows: &[&Map<String, Value>], field: &str) -> Vec<Value> {
    rows.iter()
        .map(|row| row.get(field).filter(|v| v.is_number()).cloned())
        .map(|value| value.unwrap_or(json!(0)))
        .collect()
}

fn title_plugin(config: &ChartConfig) -> Value {
    match config_str(config, "title") {
        Some(title) => json!({
            "display": true,
            "text": title,
            "font": {"size": 16, "weight": "bold"}
        }),
        None => json!({"display": false}),
    }
}

fn axis_scales(config: &ChartConfig) -> Value {
    let show_grid = config_flag(config, "showGrid", true);
    json!({
        "x": {
            "title": {
                "display": config_str(config, "xAxis").is_some(),
                "text": config_str(config, "xAxis").unwrap_or("")
            },
            "grid": {"display": show_grid}
        },
        "y": {
            "title": {
                "display": config_str(config, "yAxis").is_some(),
                "text": config_str(config, "yAxis").unwrap_or("")
            },
            "beginAtZero": config_flag(config, "beginAtZero", true),
            "grid": {"display": show_grid}
        }
    })
}

fn axis_chart(kind: &str, rows: &[&Map<String, Value>], config: &ChartConfig, fill: bool) -> Value {
    let label_field = guess_label_field(rows[0], config);
    let value_fields = guess_value_fields(rows[0], &label_field, config);
    let configured_colors = config_colors(config);
    let tension = config.get("tension").and_then(Value::as_f64).unwrap_or(0.4);

    let datasets: Vec<Value> = value_fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let color = color_at(&configured_colors, index);
            let mut dataset = json!({
                "label": field,
                "data": series(rows, field),
                "borderColor": color,
                "backgroundColor": if kind == "line" && !fill {
                    hex_to_rgba(&color, 0.1)
                } else if fill {
                    hex_to_rgba(&color, 0.2)
                } else {
                    color.clone()
                }
            });
            if kind == "line" {
                dataset["tension"] = json!(tension);
                dataset["fill"] = json!(fill);
            }
            dataset
        })
        .collect();

    json!({
        "type": kind,
        "data": {
            "labels": labels(rows, &label_field),
            "datasets": datasets
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "title": title_plugin(config),
                "legend": {
                    "display": datasets.len() > 1,
                    "position": "top"
                }
            },
            "scales": axis_scales(config)
        }
    })
}

fn pie_chart(kind: &str, rows: &[&Map<String, Value>], config: &ChartConfig) -> Value {
    let label_field = guess_label_field(rows[0], config);
    let value_field = guess_value_fields(rows[0], &label_field, config)
        .into_iter()
        .next()
        .unwrap_or_default();

    let chart_labels = labels(rows, &label_field);
    let configured_colors = config_colors(config);
    let colors: Vec<String> = (0..chart_labels.len())
        .map(|index| color_at(&configured_colors, index))
        .collect();
    let borders: Vec<String> = colors.iter().map(|c| darken_color(c, 0.2)).collect();

    json!({
        "type": kind,
        "data": {
            "labels": chart_labels,
            "datasets": [{
                "data": series(rows, &value_field),
                "backgroundColor": colors,
                "borderColor": borders,
                "borderWidth": 2
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "title": title_plugin(config),
                "legend": {
                    "position": config_str(config, "legendPosition").unwrap_or("bottom"),
                    "labels": {"padding": 20, "usePointStyle": true}
                }
            }
        }
    })
}

fn scatter_chart(rows: &[&Map<String, Value>], config: &ChartConfig) -> Value {
    let x_field = config_str(config, "xField").unwrap_or("x");
    let y_field = config_str(config, "yField").unwrap_or("y");

    let datasets: Vec<Value> = match config_str(config, "groupField") {
        Some(group_field) => {
            // preserve first-seen group order
            let mut groups: Vec<(String, Vec<Value>)> = Vec::new();
            for row in rows {
                let group = row
                    .get(group_field)
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string();
                let point = json!({"x": row.get(x_field), "y": row.get(y_field)});
                match groups.iter_mut().find(|(name, _)| *name == group) {
                    Some((_, points)) => points.push(point),
                    None => groups.push((group, vec![point])),
                }
            }
            groups
                .into_iter()
                .enumerate()
                .map(|(index, (name, points))| {
                    let color = DEFAULT_COLORS[index % DEFAULT_COLORS.len()];
                    json!({
                        "label": name,
                        "data": points,
                        "backgroundColor": color,
                        "borderColor": color
                    })
                })
                .collect()
        }
        None => {
            let points: Vec<Value> = rows
                .iter()
                .map(|row| json!({"x": row.get(x_field), "y": row.get(y_field)}))
                .collect();
            vec![json!({
                "label": config_str(config, "label").unwrap_or("Data"),
                "data": points,
                "backgroundColor": DEFAULT_COLORS[0],
                "borderColor": DEFAULT_COLORS[0]
            })]
        }
    };

    json!({
        "type": "scatter",
        "data": {"datasets": datasets},
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "title": title_plugin(config),
                "legend": {
                    "display": datasets.len() > 1,
                    "position": "top"
                }
            },
            "scales": {
                "x": {
                    "type": "linear",
                    "position": "bottom",
                    "title": {
                        "display": config_str(config, "xAxis").is_some(),
                        "text": config_str(config, "xAxis").unwrap_or("")
                    }
                },
                "y": {
                    "title": {
                        "display": config_str(config, "yAxis").is_some(),
                        "text": config_str(config, "yAxis").unwrap_or("")
                    }
                }
            }
        }
    })
}

/// `#RRGGBB` to `rgba(r, g, b, a)`
pub fn hex_to_rgba(hex: &str, alpha: f64) -> String {
    let (r, g, b) = parse_hex(hex);
    format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

/// Darken a `#RRGGBB` color by scaling each channel toward zero
pub fn darken_color(hex: &str, amount: f64) -> String {
    let (r, g, b) = parse_hex(hex);
    let scale = |channel: u8| ((f64::from(channel) * (1.0 - amount)).round() as u8);
    format!("#{:02X}{:02X}{:02X}", scale(r), scale(g), scale(b))
}

fn parse_hex(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return (0, 0, 0);
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(hex.get(range).unwrap_or("0"), 16).unwrap_or(0)
    };
    (channel(0..2), channel(2..4), channel(4..6))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metadata, Visualization};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn dataset_with(chart_type: ChartType, config: ChartConfig, data: Value) -> Dataset {
        Dataset::new(
            Metadata {
                title: "t".to_string(),
                description: "d".to_string(),
                category: "Demografia".to_string(),
                source: "s".to_string(),
                updated: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                license: "CC BY 4.0".to_string(),
                tags: Vec::new(),
                contact: None,
                frequency: None,
            },
            Some(Visualization {
                chart_type,
                config,
                template: None,
            }),
            data,
        )
    }

    #[test]
    fn test_bar_chart_guesses_fields() {
        let ds = dataset_with(
            ChartType::Bar,
            BTreeMap::new(),
            json!([
                {"distrito": "Centro", "habitantes": 12000},
                {"distrito": "Oeste", "habitantes": 9500}
            ]),
        );

        let chart = build_chart_config(&ds).unwrap();
        assert_eq!(chart["type"], json!("bar"));
        assert_eq!(chart["data"]["labels"], json!(["Centro", "Oeste"]));
        assert_eq!(
            chart["data"]["datasets"][0]["data"],
            json!([12000, 9500])
        );
        assert_eq!(chart["data"]["datasets"][0]["label"], json!("habitantes"));
    }

    #[test]
    fn test_explicit_config_fields_honored() {
        let mut config = BTreeMap::new();
        config.insert("labelField".to_string(), json!("mes"));
        config.insert("valueField".to_string(), json!("gasto"));
        config.insert("title".to_string(), json!("Gasto mensual"));

        let ds = dataset_with(
            ChartType::Line,
            config,
            json!([
                {"mes": "enero", "gasto": 100, "otros": 5},
                {"mes": "febrero", "gasto": 200, "otros": 6}
            ]),
        );

        let chart = build_chart_config(&ds).unwrap();
        assert_eq!(chart["data"]["labels"], json!(["enero", "febrero"]));
        assert_eq!(chart["data"]["datasets"][0]["data"], json!([100, 200]));
        assert_eq!(
            chart["options"]["plugins"]["title"],
            json!({"display": true, "text": "Gasto mensual", "font": {"size": 16, "weight": "bold"}})
        );
    }

    #[test]
    fn test_area_chart_fills() {
        let ds = dataset_with(
            ChartType::Area,
            BTreeMap::new(),
            json!([{"mes": "enero", "valor": 1}, {"mes": "febrero", "valor": 2}]),
        );

        let chart = build_chart_config(&ds).unwrap();
        assert_eq!(chart["type"], json!("line"));
        assert_eq!(chart["data"]["datasets"][0]["fill"], json!(true));
    }

    #[test]
    fn test_pie_chart_single_series() {
        let ds = dataset_with(
            ChartType::Pie,
            BTreeMap::new(),
            json!([
                {"tipo": "A", "total": 10},
                {"tipo": "B", "total": 20},
                {"tipo": "C", "total": 30}
            ]),
        );

        let chart = build_chart_config(&ds).unwrap();
        assert_eq!(chart["data"]["labels"], json!(["A", "B", "C"]));
        assert_eq!(chart["data"]["datasets"][0]["data"], json!([10, 20, 30]));
        let colors = chart["data"]["datasets"][0]["backgroundColor"]
            .as_array()
            .unwrap();
        assert_eq!(colors.len(), 3);
    }

    #[test]
    fn test_scatter_grouping() {
        let mut config = BTreeMap::new();
        config.insert("groupField".to_string(), json!("serie"));

        let ds = dataset_with(
            ChartType::Scatter,
            config,
            json!([
                {"x": 1, "y": 2, "serie": "a"},
                {"x": 3, "y": 4, "serie": "b"},
                {"x": 5, "y": 6, "serie": "a"}
            ]),
        );

        let chart = build_chart_config(&ds).unwrap();
        let datasets = chart["data"]["datasets"].as_array().unwrap();
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0]["label"], json!("a"));
        assert_eq!(datasets[0]["data"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_unsupported_types_fail() {
        let ds = dataset_with(
            ChartType::Heatmap,
            BTreeMap::new(),
            json!([{"a": 1}]),
        );
        let err = build_chart_config(&ds).unwrap_err();
        assert!(matches!(err, ChartError::UnsupportedType(ChartType::Heatmap)));
    }

    #[test]
    fn test_missing_visualization_fails() {
        let mut ds = dataset_with(ChartType::Bar, BTreeMap::new(), json!([{"a": 1}]));
        ds.visualization = None;
        let err = build_chart_config(&ds).unwrap_err();
        assert!(matches!(err, ChartError::MissingVisualization));
    }

    #[test]
    fn test_non_tabular_data_fails() {
        let ds = dataset_with(ChartType::Bar, BTreeMap::new(), json!({"a": 1}));
        let err = build_chart_config(&ds).unwrap_err();
        assert!(matches!(err, ChartError::NonTabularData));
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(hex_to_rgba("#2C5F2D", 0.1), "rgba(44, 95, 45, 0.1)");
        assert_eq!(darken_color("#FF0000", 0.2), "#CC0000");
    }
}
