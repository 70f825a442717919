//! Access control service

use super::rule::AccessRule;

#[derive(Debug, Clone, Default)]
pub struct AccessControlService;

impl AccessControlService {
    pub fn new() -> Self {
        Self
    }

    /// Drop repeated (identity, is_for_role) entries, keeping the first.
    /// Returns how many were removed.
    pub fn remove_duplicates(&self, rules: &mut Vec<AccessRule>) -> usize {
        let before = rules.len();
        let mut kept: Vec<AccessRule> = Vec::with_capacity(before);
        for rule in rules.drain(..) {
            if !kept.iter().any(|k| k.same_principal(&rule)) {
                kept.push(rule);
            }
        }
        *rules = kept;
        before - rules.len()
    }

    /// Reconcile `current` to `requested`: remove rules missing from the
    /// request, update the level of matching ones, append new ones.
    pub fn update_access(&self, current: &mut Vec<AccessRule>, requested: &[AccessRule]) {
        let mut requested = requested.to_vec();
        self.remove_duplicates(&mut requested);

        current.retain(|rule| requested.iter().any(|r| r.same_principal(rule)));

        for wanted in requested {
            match current.iter_mut().find(|rule| rule.same_principal(&wanted)) {
                Some(rule) => rule.access_level = wanted.access_level,
                None => current.push(wanted),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessLevel;

    #[test]
    fn test_remove_duplicates_keeps_first() {
        let service = AccessControlService::new();
        let mut rules = vec![
            AccessRule::new("editors", true, AccessLevel::ReadWrite),
            AccessRule::new("editors", true, AccessLevel::Deny),
            AccessRule::new("editors", false, AccessLevel::Read),
        ];
        assert_eq!(service.remove_duplicates(&mut rules), 1);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].access_level, AccessLevel::ReadWrite);
    }

    #[test]
    fn test_update_access_reconciles() {
        let service = AccessControlService::new();
        let mut current = vec![
            AccessRule::new("alice", false, AccessLevel::Read),
            AccessRule::new("bob", false, AccessLevel::Read),
        ];
        let requested = vec![
            AccessRule::new("alice", false, AccessLevel::ReadWrite),
            AccessRule::new("admins", true, AccessLevel::ReadWrite),
            AccessRule::new("admins", true, AccessLevel::Deny),
        ];

        service.update_access(&mut current, &requested);

        assert_eq!(
            current,
            vec![
                AccessRule::new("alice", false, AccessLevel::ReadWrite),
                AccessRule::new("admins", true, AccessLevel::ReadWrite),
            ]
        );
    }
}
