use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
}

/// Chart data handed to the renderer. Labels and values always line up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    #[serde(rename = "type")]
    kind: ChartKind,
    labels: Vec<String>,
    values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

impl ChartPayload {
    /// Pie when there are at most `pie_max_groups` slices, bar otherwise.
    pub fn from_series(series: Vec<(String, f64)>, pie_max_groups: usize) -> Self {
        let kind = if series.len() <= pie_max_groups {
            ChartKind::Pie
        } else {
            ChartKind::Bar
        };
        let (labels, values) = series.into_iter().unzip();

        Self {
            kind,
            labels,
            values,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}
