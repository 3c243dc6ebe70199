use log::debug;
use snafu::ensure;
use std::collections::HashMap;

use crate::config::*;

/// Maps the identity of a voter to the group they vote for.
///
/// This is where the identity of voters gets checked: the tally never trusts
/// a group declared by the voter.
pub trait VoterDirectory {
    fn resolve_voter_group(&self, identity: &str) -> Option<String>;
}

/// Fixed identity to group assignments.
impl VoterDirectory for HashMap<String, String> {
    fn resolve_voter_group(&self, identity: &str) -> Option<String> {
        self.get(identity).cloned()
    }
}

/// Finds the group of a voter from the domain of their e-mail address.
///
/// The domain (everything after the `@`, case insensitive) must be one of the
/// domains of a group or a sub-domain of it. The groups are tried in the
/// order of declaration and the first match wins, so a domain shared by two
/// groups belongs to the first one.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct EmailDomainDirectory {
    domains: Vec<(String, Vec<String>)>,
}

impl EmailDomainDirectory {
    pub fn new(
        contest: &Contest,
        domains: &[(String, Vec<String>)],
    ) -> Result<EmailDomainDirectory, ConfigError> {
        let mut res: Vec<(String, Vec<String>)> = Vec::new();
        for (group, group_domains) in domains.iter() {
            ensure!(
                contest.contains(group),
                UnknownDirectoryGroupSnafu {
                    group,
                    domain: group_domains.join(", ")
                }
            );
            let normalized: Vec<String> = group_domains
                .iter()
                .map(|d| d.trim().trim_start_matches('.').to_lowercase())
                .filter(|d| !d.is_empty())
                .collect();
            res.push((group.clone(), normalized));
        }
        Ok(EmailDomainDirectory { domains: res })
    }

    /// Returns true if the address belongs to any participating group.
    pub fn is_allowed(&self, email: &str) -> bool {
        self.resolve_voter_group(email).is_some()
    }
}

fn email_domain(email: &str) -> Option<String> {
    let domain = email.split('@').nth(1)?.trim().to_lowercase();
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

fn domain_matches(domain: &str, expected: &str) -> bool {
    domain == expected
        || domain
            .strip_suffix(expected)
            .map(|prefix| prefix.ends_with('.'))
            .unwrap_or(false)
}

impl VoterDirectory for EmailDomainDirectory {
    fn resolve_voter_group(&self, identity: &str) -> Option<String> {
        let domain = email_domain(identity)?;
        let res = self
            .domains
            .iter()
            .find(|(_, ds)| ds.iter().any(|d| domain_matches(&domain, d)))
            .map(|(group, _)| group.clone());
        debug!("resolve_voter_group: {:?} -> {:?}", domain, res);
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contest() -> Contest {
        let groups: Vec<String> = ["ATKA", "Filmacademie", "Gent"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Contest::new(
            &groups,
            PointScale::new(&[1, 0]).unwrap(),
            TieBreakMode::Alphabetical,
        )
        .unwrap()
    }

    fn directory() -> EmailDomainDirectory {
        EmailDomainDirectory::new(
            &contest(),
            &[
                ("ATKA".to_string(), vec!["ahk.nl".to_string()]),
                (
                    "Filmacademie".to_string(),
                    vec!["ahk.nl".to_string(), "planet.nl".to_string()],
                ),
                ("Gent".to_string(), vec!["HoGent.be".to_string()]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn resolves_by_domain() {
        let d = directory();
        assert_eq!(
            d.resolve_voter_group("jan@planet.nl"),
            Some("Filmacademie".to_string())
        );
        assert_eq!(
            d.resolve_voter_group("Jan@HOGENT.be"),
            Some("Gent".to_string())
        );
    }

    #[test]
    fn accepts_subdomains_only_on_label_boundaries() {
        let d = directory();
        assert_eq!(
            d.resolve_voter_group("an@student.hogent.be"),
            Some("Gent".to_string())
        );
        assert_eq!(d.resolve_voter_group("an@nothogent.be"), None);
    }

    #[test]
    fn first_declared_group_wins() {
        assert_eq!(
            directory().resolve_voter_group("lisa@ahk.nl"),
            Some("ATKA".to_string())
        );
    }

    #[test]
    fn malformed_addresses_do_not_resolve() {
        let d = directory();
        assert_eq!(d.resolve_voter_group("hogent.be"), None);
        assert_eq!(d.resolve_voter_group("jan@"), None);
        assert_eq!(d.resolve_voter_group(""), None);
        assert!(!d.is_allowed("jan@gmail.com"));
        assert!(d.is_allowed("jan@ahk.nl"));
    }

    #[test]
    fn unknown_groups_are_refused() {
        let res = EmailDomainDirectory::new(
            &contest(),
            &[("Leuven".to_string(), vec!["kuleuven.be".to_string()])],
        );
        assert_eq!(
            res,
            Err(ConfigError::UnknownDirectoryGroup {
                group: "Leuven".to_string(),
                domain: "kuleuven.be".to_string()
            })
        );
    }

    #[test]
    fn fixed_assignments() {
        let mut m: HashMap<String, String> = HashMap::new();
        m.insert("voter-1".to_string(), "Gent".to_string());
        assert_eq!(m.resolve_voter_group("voter-1"), Some("Gent".to_string()));
        assert_eq!(m.resolve_voter_group("voter-2"), None);
    }
}
