// ABOUTME: ToolKind - the closed set of tool kinds a plan may reference.
// ABOUTME: Identifiers are the strings planners write into agent tool lists.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A known tool kind.
///
/// The serialized form is the planner-facing identifier, so `parse()` and
/// `to_string()` round-trip exactly (matching is case-sensitive).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
    IntoStaticStr,
)]
pub enum ToolKind {
    #[strum(serialize = "SearchTools.search_internet")]
    SearchInternet,

    #[strum(serialize = "SearchTools.search_news")]
    SearchNews,

    #[strum(serialize = "SearchTools.search_internal_documents")]
    SearchInternalDocuments,

    #[strum(serialize = "CalculatorTools.calculate")]
    Calculate,

    #[strum(serialize = "PowerpointTools.generate_slide")]
    GenerateSlides,
}

impl ToolKind {
    /// The planner-facing identifier, e.g. `CalculatorTools.calculate`.
    pub fn identifier(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_identifiers_round_trip() {
        for kind in ToolKind::iter() {
            assert_eq!(kind.identifier().parse::<ToolKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.identifier());
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(
            "CalculatorTools.calculate".parse::<ToolKind>().unwrap(),
            ToolKind::Calculate
        );
        assert!("calculatortools.calculate".parse::<ToolKind>().is_err());
        assert!("SearchTools.search_everything".parse::<ToolKind>().is_err());
    }
}
