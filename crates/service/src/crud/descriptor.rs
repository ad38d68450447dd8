use crate::validation::{RuleError, RuleSet};

use super::resource::Resource;

/// Rule set and optional unique field bound to one relation.
#[derive(Debug, Clone)]
pub struct RelationDescriptor<R: Resource> {
    create_rules: RuleSet,
    update_rules: RuleSet,
    unique_field: Option<R::Field>,
}

impl<R: Resource> RelationDescriptor<R> {
    /// Update rules are the create rules with every field made optional.
    pub fn new(rules: RuleSet, unique_field: Option<R::Field>) -> Self {
        let update_rules = rules.as_optional();
        Self { create_rules: rules, update_rules, unique_field }
    }

    pub fn parse<'a, I>(rules: I, unique_field: Option<R::Field>) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Ok(Self::new(RuleSet::parse(rules)?, unique_field))
    }

    pub fn relation(&self) -> &'static str {
        R::RELATION
    }

    pub fn create_rules(&self) -> &RuleSet {
        &self.create_rules
    }

    pub fn update_rules(&self) -> &RuleSet {
        &self.update_rules
    }

    pub fn unique_field(&self) -> Option<R::Field> {
        self.unique_field
    }
}
