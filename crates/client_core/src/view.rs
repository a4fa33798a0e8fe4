/// Display regions the review output is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Review,
    Coverage,
    Tree,
}

impl Region {
    pub fn id(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Coverage => "coverage",
            Self::Tree => "tree",
        }
    }
}

/// Where a submission renders its result.
pub trait ReviewView {
    fn set_text(&mut self, region: Region, text: &str);
    /// Makes the (initially hidden) output container visible.
    fn reveal_output(&mut self);
    /// Blocking, user-facing notice for a failed review.
    fn alert(&mut self, message: &str);
}

/// In-memory page: region texts, output visibility and alert history.
#[derive(Debug, Clone)]
pub struct ReviewPage {
    review: String,
    coverage: String,
    tree: String,
    output_hidden: bool,
    alerts: Vec<String>,
}

impl Default for ReviewPage {
    fn default() -> Self {
        Self {
            review: String::new(),
            coverage: String::new(),
            tree: String::new(),
            output_hidden: true,
            alerts: Vec::new(),
        }
    }
}

impl ReviewPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, region: Region) -> &str {
        match region {
            Region::Review => &self.review,
            Region::Coverage => &self.coverage,
            Region::Tree => &self.tree,
        }
    }

    pub fn output_visible(&self) -> bool {
        !self.output_hidden
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }
}

impl ReviewView for ReviewPage {
    fn set_text(&mut self, region: Region, text: &str) {
        let slot = match region {
            Region::Review => &mut self.review,
            Region::Coverage => &mut self.coverage,
            Region::Tree => &mut self.tree,
        };
        *slot = text.to_string();
    }

    fn reveal_output(&mut self) {
        self.output_hidden = false;
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
