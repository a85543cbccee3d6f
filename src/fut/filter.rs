use super::model::{FutRequest, FutStatus, UnknownCode, UrgencyLevel};

/// Criteria of the FUT list screen. Every criterion is optional and they
/// combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FutFilter {
    pub search_term: String,
    pub status: Option<FutStatus>,
    pub urgency: Option<UrgencyLevel>,
}

fn parse_choice<T: std::str::FromStr<Err = UnknownCode>>(
    value: Option<&str>,
) -> Result<Option<T>, UnknownCode> {
    match value.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(code) => code.parse().map(Some),
    }
}

impl FutFilter {
    pub fn by_request_number(term: &str) -> Self {
        Self {
            search_term: term.to_string(),
            ..Default::default()
        }
    }

    /// Builds a filter from raw query values; blank and `all` mean "any".
    pub fn parse(
        search: Option<&str>,
        status: Option<&str>,
        urgency: Option<&str>,
    ) -> Result<Self, UnknownCode> {
        Ok(Self {
            search_term: search.unwrap_or("").to_string(),
            status: parse_choice(status)?,
            urgency: parse_choice(urgency)?,
        })
    }

    pub fn matches(&self, request: &FutRequest) -> bool {
        let needle = self.search_term.trim().to_lowercase();
        let number_matches =
            needle.is_empty() || request.request_number.to_lowercase().contains(&needle);
        let status_matches = self.status.map_or(true, |s| request.status == Some(s));
        let urgency_matches = self.urgency.map_or(true, |u| request.urgency_level == Some(u));
        number_matches && status_matches && urgency_matches
    }

    pub fn apply(&self, requests: &[FutRequest]) -> Vec<FutRequest> {
        requests.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(number: &str, status: FutStatus, urgency: UrgencyLevel) -> FutRequest {
        FutRequest {
            id: number.to_lowercase(),
            request_number: number.into(),
            status: Some(status),
            urgency_level: Some(urgency),
            ..Default::default()
        }
    }

    fn sample() -> Vec<FutRequest> {
        vec![
            request("4567JP", FutStatus::Pendiente, UrgencyLevel::Alta),
            request("1234AS", FutStatus::Aprobado, UrgencyLevel::Alta),
            request("FUT-20250314093005", FutStatus::Pendiente, UrgencyLevel::Baja),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        assert_eq!(FutFilter::default().apply(&sample()).len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let found = FutFilter::by_request_number("jp").apply(&sample());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].request_number, "4567JP");
    }

    #[test]
    fn test_criteria_combine() {
        let filter = FutFilter::parse(None, Some("PENDIENTE"), Some("ALTA")).unwrap();
        let found = filter.apply(&sample());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].request_number, "4567JP");
    }

    #[test]
    fn test_all_and_blank_disable_criteria() {
        let filter = FutFilter::parse(Some(""), Some("all"), Some("")).unwrap();
        assert_eq!(filter, FutFilter::default());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(FutFilter::parse(None, Some("ARCHIVADO"), None).is_err());
    }
}
