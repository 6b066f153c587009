//! Checks candidate directives against a task configuration, repairing the
//! common command/action mix-ups a language model makes.

use std::collections::BTreeMap;
use std::mem;

use log::{debug, warn};

use crate::models::{Directive, PropertyValue, TaskConfig};

/// Validates directives for one task mode.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    config: &'a TaskConfig,
    existing: &'a BTreeMap<String, PropertyValue>,
}

impl<'a> Validator<'a> {
    /// `existing` holds properties the caller already knows; they satisfy
    /// required properties without appearing in the directive.
    pub fn new(config: &'a TaskConfig, existing: &'a BTreeMap<String, PropertyValue>) -> Self {
        Self { config, existing }
    }

    /// Returns the accepted, healed directive or `None` when it is dropped.
    pub fn validate(&self, directive: Directive) -> Option<Directive> {
        let mut directive = self.heal(directive)?;

        if self.config.actions().is_empty() {
            directive.action = None;
        } else if !directive
            .action
            .as_deref()
            .is_some_and(|a| self.config.has_action(a))
        {
            debug!(
                "dropping /{}: action {:?} is not allowed",
                directive.command, directive.action
            );
            return None;
        }

        directive
            .properties
            .retain(|name| self.config.declares_property(name));

        let missing = self.missing_required(&directive);
        if !missing.is_empty() {
            warn!(
                "dropping /{}: missing required properties {}",
                directive.command,
                missing.join(", ")
            );
            return None;
        }

        Some(directive)
    }

    /// Makes the command legal if one of the known repairs applies.
    fn heal(&self, mut directive: Directive) -> Option<Directive> {
        let config = self.config;
        if config.has_command(&directive.command) {
            return Some(directive);
        }

        // `/add` typed where `/routine add` was meant
        if config.has_action(&directive.command)
            && let Some(sole) = config.sole_command()
        {
            let action = mem::replace(&mut directive.command, sole.to_owned());
            debug!("healed /{action} into /{sole} {action}");
            directive.action = Some(action);
            return Some(directive);
        }

        // `/routine add` where the task only knows the command `add`
        if config.actions().is_empty()
            && let Some(action) = directive.action.take_if(|a| config.has_command(a))
        {
            debug!("healed /{} {action} into /{action}", directive.command);
            directive.command = action;
            return Some(directive);
        }

        debug!("dropping /{}: unknown command", directive.command);
        None
    }

    /// Required properties neither present in the directive nor known to the
    /// caller.
    pub fn missing_required(&self, directive: &Directive) -> Vec<&'a str> {
        self.config
            .required_properties()
            .filter(|name| {
                !directive.properties.contains_key(name) && !self.existing.contains_key(*name)
            })
            .collect()
    }
}
