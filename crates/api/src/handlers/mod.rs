pub mod circuit;
pub mod dashboard;
pub mod driver;
pub mod lap_time;
pub mod team;

use serde::Deserialize;

/// Query string of the `buscar` endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub nombre: Option<String>,
}

impl SearchParams {
    /// The trimmed search term, or `None` when it is missing or blank.
    pub fn term(&self) -> Option<&str> {
        self.nombre
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::SearchParams;

    #[test]
    fn blank_term_means_no_filter() {
        let params = SearchParams {
            nombre: Some("   ".into()),
        };
        assert_eq!(params.term(), None);
        assert_eq!(SearchParams::default().term(), None);
    }

    #[test]
    fn term_is_trimmed() {
        let params = SearchParams {
            nombre: Some(" ferr ".into()),
        };
        assert_eq!(params.term(), Some("ferr"));
    }
}
