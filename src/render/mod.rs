//! Result sections and their disclosure state.
//!
//! A [`ResultView`] owns one [`Section`] per resolved record, in resolution
//! order. Disclosure bits are positional: the toggle vector written to the
//! navigation state lines up with `sections` index for index.

pub mod markdown;
pub mod page;

use crate::models::{BallotRecord, ContentVariant, ParsedQuery};
use crate::resolver::Resolution;

/// What the results area currently shows.
#[derive(Debug)]
pub enum View {
    Loading,
    Default,
    Results(ResultView),
    Empty,
}

#[derive(Debug, Clone)]
pub struct Section {
    pub record: BallotRecord,
    pub expanded: bool,
    pub active: ContentVariant,
    pub visualization: Option<String>,
}

impl Section {
    pub fn title(&self) -> String {
        self.record.title()
    }

    /// Both variants present, so a view switch is offered.
    pub fn has_switch(&self) -> bool {
        self.record.has_enhanced()
    }

    pub fn body_html(&self) -> String {
        let content = self
            .record
            .content(self.active)
            .unwrap_or(&self.record.ballot_markdown);
        markdown::to_html(content)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultView {
    sections: Vec<Section>,
}

impl ResultView {
    pub fn new(resolution: Resolution, toggles: Option<&[bool]>) -> Self {
        let expanded = initial_disclosure(&resolution.records, resolution.parsed.as_ref(), toggles);
        let visualizations = resolution.visualizations;

        let sections = resolution
            .records
            .into_iter()
            .zip(expanded)
            .map(|(record, expanded)| Section {
                visualization: visualizations.get(&record.zip).cloned(),
                record,
                expanded,
                active: ContentVariant::Simplified,
            })
            .collect();

        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Current disclosure bit of every section, in order.
    pub fn toggles(&self) -> Vec<bool> {
        self.sections.iter().map(|s| s.expanded).collect()
    }

    /// Flips section `index` and returns the full toggle vector afterwards,
    /// or `None` when there is no such section.
    pub fn on_toggle(&mut self, index: usize) -> Option<Vec<bool>> {
        let section = self.sections.get_mut(index)?;
        section.expanded = !section.expanded;
        Some(self.toggles())
    }

    /// Shows `variant` in section `index`. Returns false, changing nothing,
    /// when the section does not exist or lacks that variant.
    pub fn on_tab_switch(&mut self, index: usize, variant: ContentVariant) -> bool {
        match self.sections.get_mut(index) {
            Some(section) if section.record.content(variant).is_some() => {
                section.active = variant;
                true
            }
            _ => false,
        }
    }
}

/// Which records start expanded. First rule that applies wins:
/// a lone record is expanded; a stored toggle vector is applied by position;
/// a single record matching the parsed (county, zip) is expanded;
/// otherwise everything is collapsed.
pub fn initial_disclosure(
    records: &[BallotRecord],
    parsed: Option<&ParsedQuery>,
    toggles: Option<&[bool]>,
) -> Vec<bool> {
    let mut expanded = vec![false; records.len()];

    if records.len() == 1 {
        expanded[0] = true;
        return expanded;
    }

    if let Some(toggles) = toggles {
        for (slot, bit) in expanded.iter_mut().zip(toggles) {
            *slot = *bit;
        }
        return expanded;
    }

    if let Some(parsed) = parsed {
        let hits: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| county_matches(&r.county, &parsed.county) && r.zip == parsed.zip)
            .map(|(i, _)| i)
            .collect();
        if let [only] = hits.as_slice() {
            expanded[*only] = true;
        }
    }

    expanded
}

/// Suggestions read "Cook County, Illinois (60629)" while rows store plain
/// "Cook", so either spelling counts.
fn county_matches(stored: &str, queried: &str) -> bool {
    let stored = stored.to_lowercase();
    let queried = queried.trim().to_lowercase();
    let bare = queried.strip_suffix(" county").unwrap_or(&queried);
    stored == queried || stored == bare
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record;
    use crate::parser::parse_term;
    use std::collections::HashMap;

    fn resolution(records: Vec<BallotRecord>, query: &str) -> Resolution {
        Resolution {
            parsed: parse_term(query),
            records,
            visualizations: HashMap::new(),
        }
    }

    fn three() -> Vec<BallotRecord> {
        vec![
            record("Cheshire", "New Hampshire", "03446", "# A"),
            record("Cheshire", "New Hampshire", "03431", "# B"),
            record("Cook", "Illinois", "60629", "# C"),
        ]
    }

    #[test]
    fn single_record_always_expands() {
        let records = vec![record("Cheshire", "New Hampshire", "03446", "# Races")];
        assert_eq!(initial_disclosure(&records, None, Some(&[false][..])), vec![true]);
        assert_eq!(initial_disclosure(&records, None, None), vec![true]);
    }

    #[test]
    fn stored_toggles_apply_by_position() {
        let records = three();
        let parsed = parse_term("Cook, Illinois (60629)");
        assert_eq!(
            initial_disclosure(&records, parsed.as_ref(), Some(&[false, true][..])),
            vec![false, true, false]
        );
        assert_eq!(
            initial_disclosure(&records, None, Some(&[true, true, true, true][..])),
            vec![true, true, true]
        );
    }

    #[test]
    fn unique_county_zip_match_expands() {
        let records = three();
        let parsed = parse_term("cook, Illinois (60629)");
        assert_eq!(initial_disclosure(&records, parsed.as_ref(), None), vec![false, false, true]);

        let parsed = parse_term("Cook County, Illinois (60629)");
        assert_eq!(initial_disclosure(&records, parsed.as_ref(), None), vec![false, false, true]);
    }

    #[test]
    fn county_suffix_is_optional() {
        assert!(county_matches("Cook", "cook"));
        assert!(county_matches("Cook", "Cook County"));
        assert!(!county_matches("Cook", "Cooks County"));
        assert!(!county_matches("Cook", " County"));
    }

    #[test]
    fn ambiguous_match_stays_collapsed() {
        let mut records = three();
        records.push(record("Cook", "Illinois", "60629", "# D"));
        let parsed = parse_term("Cook, Illinois (60629)");
        assert_eq!(initial_disclosure(&records, parsed.as_ref(), None), vec![false; 4]);
        assert_eq!(initial_disclosure(&records, None, None), vec![false; 4]);
    }

    #[test]
    fn toggle_flips_only_that_section() {
        let mut view = ResultView::new(resolution(three(), "hampshire"), Some(&[true, false, true][..]));

        assert_eq!(view.on_toggle(1), Some(vec![true, true, true]));
        assert_eq!(view.on_toggle(0), Some(vec![false, true, true]));
        assert_eq!(view.on_toggle(3), None);
        assert_eq!(view.toggles(), vec![false, true, true]);
    }

    #[test]
    fn tab_switch_requires_the_variant() {
        let mut records = three();
        records[0].full_enhanced_ballot = Some("# Everything".to_string());
        let mut view = ResultView::new(resolution(records, "x"), None);

        assert!(view.sections()[0].has_switch());
        assert!(!view.sections()[1].has_switch());

        assert!(view.on_tab_switch(0, ContentVariant::Enhanced));
        assert_eq!(view.sections()[0].body_html(), "<h1>Everything</h1>\n");

        assert!(!view.on_tab_switch(1, ContentVariant::Enhanced));
        assert_eq!(view.sections()[1].active, ContentVariant::Simplified);
        assert!(!view.on_tab_switch(9, ContentVariant::Simplified));

        assert!(view.on_tab_switch(0, ContentVariant::Simplified));
        assert_eq!(view.sections()[0].body_html(), "<h1>A</h1>\n");
    }

    #[test]
    fn sections_pick_up_their_visualization() {
        let mut res = resolution(three(), "x");
        res.visualizations.insert("60629".to_string(), "maps/60629.html".to_string());
        let view = ResultView::new(res, None);

        assert_eq!(view.sections()[0].visualization, None);
        assert_eq!(view.sections()[2].visualization.as_deref(), Some("maps/60629.html"));
    }
}
