//! Adobe Font Metrics (AFM) lexer, for the fourteen standard fonts. AFM is
//! line-oriented, unlike the other three lexers, so this is a line scanner
//! rather than a byte-at-a-time tokenizer.

use std::collections::HashMap;

/// One `StartCharMetrics`/`EndCharMetrics` entry.
#[derive(Debug, Clone)]
pub struct CharMetric {
    pub code: i32,
    pub width: f64,
    pub name: String,
}

/// Parsed AFM font-metric record.
#[derive(Debug, Clone, Default)]
pub struct AfmFont {
    pub font_name: String,
    pub char_metrics: Vec<CharMetric>,
    /// name -> (width, code) for O(1) glyph-name lookup.
    pub by_name: HashMap<String, (f64, i32)>,
    pub kerning: HashMap<(String, String), f64>,
}

impl AfmFont {
    pub fn width_for_name(&self, name: &str) -> Option<f64> {
        self.by_name.get(name).map(|&(w, _)| w)
    }
}

pub fn parse_afm(text: &str) -> AfmFont {
    let mut font = AfmFont::default();
    let mut in_char_metrics = false;
    let mut in_kern_pairs = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("FontName") {
            font.font_name = rest.trim().to_string();
            continue;
        }
        if line.starts_with("StartCharMetrics") {
            in_char_metrics = true;
            continue;
        }
        if line.starts_with("EndCharMetrics") {
            in_char_metrics = false;
            continue;
        }
        if line.starts_with("StartKernPairs") {
            in_kern_pairs = true;
            continue;
        }
        if line.starts_with("EndKernPairs") || line.starts_with("EndKernData") {
            in_kern_pairs = false;
            continue;
        }

        if in_char_metrics {
            if let Some(metric) = parse_char_metric_line(line) {
                font.by_name
                    .insert(metric.name.clone(), (metric.width, metric.code));
                font.char_metrics.push(metric);
            }
        } else if in_kern_pairs {
            if let Some(kpx) = line.strip_prefix("KPX ") {
                let parts: Vec<&str> = kpx.split_whitespace().collect();
                if parts.len() == 3 {
                    if let Ok(adj) = parts[2].parse::<f64>() {
                        font.kerning
                            .insert((parts[0].to_string(), parts[1].to_string()), adj);
                    }
                }
            }
        }
    }

    font
}

/// Parses one `C code ; WX width ; N name ; B x1 y1 x2 y2 ; L succ lig` line.
fn parse_char_metric_line(line: &str) -> Option<CharMetric> {
    let mut code = -1i32;
    let mut width = 0.0f64;
    let mut name = String::new();

    for field in line.split(';') {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let mut parts = field.splitn(2, char::is_whitespace);
        let key = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("").trim();
        match key {
            "C" => code = value.parse().unwrap_or(-1),
            "WX" => width = value.parse().unwrap_or(0.0),
            "N" => name = value.to_string(),
            _ => {}
        }
    }

    if name.is_empty() {
        None
    } else {
        Some(CharMetric { code, width, name })
    }
}
