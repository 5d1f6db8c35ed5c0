//! Privacy-policy information items and the Markdown skeleton built from them.

use regstruct_core::view::PolicySection;

use crate::{KnowledgeStore, StoreError};

/// (section name, description, related articles, required information).
pub(crate) const POLICY_SECTIONS: &[(&str, &str, &str, &str)] = &[
    (
        "Identity and Contact Details",
        "Information about the data controller and their contact details",
        "13(1)(a), 14(1)(a)",
        "Controller identity, contact details, DPO contact if applicable",
    ),
    (
        "Types of Data Collected",
        "Categories of personal data being processed",
        "13(1)(c), 14(1)(d)",
        "Description of all categories of personal data processed",
    ),
    (
        "Purposes of Processing",
        "Purposes for which personal data is processed",
        "13(1)(c), 14(1)(c)",
        "All purposes for which data is collected and processed",
    ),
    (
        "Legal Basis",
        "Legal basis for processing personal data",
        "13(1)(c), 14(1)(c)",
        "Legal basis under Article 6 (and Article 9 if applicable)",
    ),
    (
        "Recipients of Data",
        "Third parties who receive the data",
        "13(1)(e), 14(1)(e)",
        "Recipients or categories of recipients of personal data",
    ),
    (
        "Data Transfers",
        "Information about international data transfers",
        "13(1)(f), 14(1)(f)",
        "Details of transfers to third countries, safeguards, means to obtain copy",
    ),
    (
        "Retention Period",
        "How long data will be stored",
        "13(2)(a), 14(2)(a)",
        "Period data will be stored or criteria to determine period",
    ),
    (
        "Data Subject Rights",
        "Rights available to individuals",
        "13(2)(b), 14(2)(c)",
        "Access, rectification, erasure, restriction, objection, portability rights",
    ),
    (
        "Withdrawal of Consent",
        "Right to withdraw consent at any time",
        "13(2)(c), 14(2)(d)",
        "Information about right to withdraw consent and how to do so",
    ),
    (
        "Complaint Rights",
        "Right to lodge a complaint with supervisory authority",
        "13(2)(d), 14(2)(e)",
        "Right to lodge complaint and contact details of supervisory authority",
    ),
    (
        "Automated Decision Making",
        "Information about automated decision-making, including profiling",
        "13(2)(f), 14(2)(g)",
        "Existence, logic involved, significance and consequences of such processing",
    ),
];

impl KnowledgeStore {
    /// The seeded information items, in insertion order.
    pub fn policy_sections(&self) -> Result<Vec<PolicySection>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT section_name, description, related_articles, required_information
             FROM privacy_policy_sections
             ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(PolicySection {
                section_name: row.get(0)?,
                description: row.get(1)?,
                related_articles: row.get(2)?,
                required_information: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Markdown privacy-policy skeleton: one heading per information item.
    pub fn policy_template(&self) -> Result<String, StoreError> {
        Ok(render_template(&self.policy_sections()?))
    }
}

pub(crate) fn render_template(sections: &[PolicySection]) -> String {
    let mut out = String::from("# Privacy Policy\n\n");
    out.push_str("_Last updated: [DATE]_\n\n");
    out.push_str("## Introduction\n\n");
    out.push_str(
        "[Company Name] is committed to protecting your privacy. This Privacy Policy explains how we \
         collect, use, disclose, and safeguard your information when you [describe service/product/website].\n\n",
    );
    out.push_str(
        "Please read this Privacy Policy carefully. If you do not agree with the terms of this Privacy \
         Policy, please do not access our services.\n\n",
    );

    for section in sections {
        out.push_str(&format!("## {}\n\n", section.section_name));
        out.push_str(&format!("_{}_\n\n", section.description));
        out.push_str(&format!(
            "[Explain {} - Required by GDPR Articles {}]\n\n",
            section.section_name.to_lowercase(),
            section.related_articles
        ));
        out.push_str(&format!(
            "This section should include: {}\n\n",
            section.required_information
        ));
    }

    out.push_str("## Changes to This Privacy Policy\n\n");
    out.push_str(
        "We may update our Privacy Policy from time to time. We will notify you of any changes by \
         posting the new Privacy Policy on this page and updating the 'Last updated' date.\n\n",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<PolicySection> {
        POLICY_SECTIONS
            .iter()
            .map(|&(name, description, articles, info)| PolicySection {
                section_name: name.into(),
                description: description.into(),
                related_articles: articles.into(),
                required_information: info.into(),
            })
            .collect()
    }

    #[test]
    fn eleven_fixed_items() {
        assert_eq!(POLICY_SECTIONS.len(), 11);
        assert_eq!(POLICY_SECTIONS[0].0, "Identity and Contact Details");
        assert_eq!(POLICY_SECTIONS[10].2, "13(2)(f), 14(2)(g)");
    }

    #[test]
    fn template_has_a_heading_per_item() {
        let md = render_template(&sections());
        assert!(md.starts_with("# Privacy Policy\n\n"));
        assert_eq!(md.matches("\n## ").count(), 11 + 2);
        assert!(md.contains("[Explain legal basis - Required by GDPR Articles 13(1)(c), 14(1)(c)]"));
        assert!(md.trim_end().ends_with("'Last updated' date."));
    }

    #[test]
    fn empty_store_renders_frame_only() {
        let store = KnowledgeStore::open().unwrap();
        assert!(store.policy_sections().unwrap().is_empty());
        let md = store.policy_template().unwrap();
        assert!(md.contains("## Introduction"));
        assert!(!md.contains("## Legal Basis"));
    }
}
