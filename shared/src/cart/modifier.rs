//! Modifier selection for a single option group
//!
//! A [`ModifierSelector`] holds the group definition snapshot plus the
//! current selection. SINGLE groups replace the prior pick; MULTIPLE groups
//! cap at `max_options` and report an over-cap select as [`SelectOutcome::Rejected`]
//! rather than an error - the user may be clicking client-side ahead of
//! validation, so the caller treats it as a UI-level rejection.
//!
//! Server-side code re-validates with [`validate_selection`] at submission
//! regardless of what a client already checked.

use crate::error::{PosError, PosResult};
use crate::models::option_group::{OptionGroup, OptionItem, SelectionType};
use crate::money::{Currency, Money};

/// Result of a select call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Option added to the selection
    Applied,
    /// SINGLE group: option replaced the previous selection
    Replaced,
    /// MULTIPLE group at max_options: no-op, caller shows a UI rejection
    Rejected,
}

/// Selection state over one option group
#[derive(Debug, Clone)]
pub struct ModifierSelector {
    group: OptionGroup,
    selected: Vec<OptionItem>,
}

impl ModifierSelector {
    /// Create a selector, checking the group definition invariants first
    pub fn new(group: OptionGroup) -> PosResult<Self> {
        group.validate_definition()?;
        Ok(Self {
            group,
            selected: Vec::new(),
        })
    }

    pub fn group(&self) -> &OptionGroup {
        &self.group
    }

    pub fn selected(&self) -> &[OptionItem] {
        &self.selected
    }

    /// Select an option by id
    pub fn select(&mut self, option_id: &str) -> PosResult<SelectOutcome> {
        let option = self
            .group
            .find_option(option_id)
            .ok_or_else(|| PosError::OptionNotInGroup {
                group_id: self.group.id.clone(),
                option_id: option_id.to_string(),
            })?
            .clone();

        // Re-selecting an already selected option is a no-op apply
        if self.selected.iter().any(|o| o.id == option.id) {
            return Ok(SelectOutcome::Applied);
        }

        match self.group.selection_type {
            SelectionType::Single => {
                let replaced = !self.selected.is_empty();
                self.selected.clear();
                self.selected.push(option);
                Ok(if replaced {
                    SelectOutcome::Replaced
                } else {
                    SelectOutcome::Applied
                })
            }
            SelectionType::Multiple => {
                if self.selected.len() >= self.group.max_options as usize {
                    tracing::debug!(
                        group_id = %self.group.id,
                        option_id = %option_id,
                        max_options = self.group.max_options,
                        "selection rejected: group at max_options"
                    );
                    return Ok(SelectOutcome::Rejected);
                }
                self.selected.push(option);
                Ok(SelectOutcome::Applied)
            }
        }
    }

    /// Remove an option from the selection; returns whether it was present
    pub fn deselect(&mut self, option_id: &str) -> bool {
        let before = self.selected.len();
        self.selected.retain(|o| o.id != option_id);
        self.selected.len() != before
    }

    /// Check the required-minimum rule for the current selection
    pub fn validate(&self) -> PosResult<()> {
        validate_selection(&self.group, self.selected.len())
    }

    /// Price contribution of the current selection
    pub fn price_contribution(&self, currency: Currency) -> PosResult<Money> {
        price_contribution(&self.selected, currency)
    }

    /// Consume the selector, keeping the selection snapshot for a cart line
    pub fn into_selected(self) -> Vec<OptionItem> {
        self.selected
    }
}

/// Required-minimum rule: fails iff `is_required && selected < min_options`
pub fn validate_selection(group: &OptionGroup, selected: usize) -> PosResult<()> {
    if group.is_required && selected < group.min_options as usize {
        return Err(PosError::MissingRequiredSelection {
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            selected,
            min_options: group.min_options,
        });
    }
    Ok(())
}

/// Sum of `price_delta` over selected options
pub fn price_contribution(selected: &[OptionItem], currency: Currency) -> PosResult<Money> {
    let mut total = Money::zero(currency);
    for option in selected {
        total = total.add(option.price_delta)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, delta: i64) -> OptionItem {
        OptionItem {
            id: id.to_string(),
            name: id.to_uppercase(),
            price_delta: Money::new(delta, Currency::Brl),
        }
    }

    fn single_group() -> OptionGroup {
        OptionGroup {
            id: "size".to_string(),
            name: "Size".to_string(),
            selection_type: SelectionType::Single,
            is_required: true,
            min_options: 1,
            max_options: 1,
            options: vec![option("small", 0), option("large", 400)],
        }
    }

    fn multi_group(max: u32) -> OptionGroup {
        OptionGroup {
            id: "extras".to_string(),
            name: "Extras".to_string(),
            selection_type: SelectionType::Multiple,
            is_required: false,
            min_options: 0,
            max_options: max,
            options: vec![option("bacon", 300), option("cheese", 500), option("egg", 200)],
        }
    }

    #[test]
    fn test_single_replaces_prior_selection() {
        let mut selector = ModifierSelector::new(single_group()).unwrap();
        assert_eq!(selector.select("small").unwrap(), SelectOutcome::Applied);
        assert_eq!(selector.select("large").unwrap(), SelectOutcome::Replaced);
        assert_eq!(selector.selected().len(), 1);
        assert_eq!(selector.selected()[0].id, "large");
    }

    #[test]
    fn test_multiple_rejects_over_max_as_noop() {
        let mut selector = ModifierSelector::new(multi_group(2)).unwrap();
        assert_eq!(selector.select("bacon").unwrap(), SelectOutcome::Applied);
        assert_eq!(selector.select("cheese").unwrap(), SelectOutcome::Applied);
        assert_eq!(selector.select("egg").unwrap(), SelectOutcome::Rejected);
        assert_eq!(selector.selected().len(), 2);
    }

    #[test]
    fn test_unknown_option_fails() {
        let mut selector = ModifierSelector::new(multi_group(2)).unwrap();
        let result = selector.select("truffle");
        assert!(matches!(result, Err(PosError::OptionNotInGroup { .. })));
    }

    #[test]
    fn test_deselect() {
        let mut selector = ModifierSelector::new(multi_group(2)).unwrap();
        selector.select("bacon").unwrap();
        assert!(selector.deselect("bacon"));
        assert!(!selector.deselect("bacon"));
        assert!(selector.selected().is_empty());
    }

    #[test]
    fn test_validate_required_minimum() {
        let selector = ModifierSelector::new(single_group()).unwrap();
        let result = selector.validate();
        assert!(matches!(
            result,
            Err(PosError::MissingRequiredSelection {
                selected: 0,
                min_options: 1,
                ..
            })
        ));

        let mut selector = ModifierSelector::new(single_group()).unwrap();
        selector.select("small").unwrap();
        assert!(selector.validate().is_ok());
    }

    #[test]
    fn test_optional_group_validates_when_empty() {
        let selector = ModifierSelector::new(multi_group(2)).unwrap();
        assert!(selector.validate().is_ok());
    }

    #[test]
    fn test_price_contribution() {
        let mut selector = ModifierSelector::new(multi_group(2)).unwrap();
        selector.select("bacon").unwrap();
        selector.select("cheese").unwrap();
        assert_eq!(
            selector.price_contribution(Currency::Brl).unwrap(),
            Money::new(800, Currency::Brl)
        );
    }

    #[test]
    fn test_invalid_definition_rejected_at_construction() {
        let mut group = multi_group(2);
        group.min_options = 5;
        assert!(ModifierSelector::new(group).is_err());
    }
}
