//! Plain rendering of the portfolio for the `print` command.
//!
//! Pure functions: (Portfolio, OutputFormat) → String. No I/O.

use crate::types::{OutputFormat, Portfolio, SectionId};

/// Format the portfolio for output.
///
/// Only JSON encoding can fail.
pub fn format_report(portfolio: &Portfolio, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Human => Ok(format_human(portfolio)),
        OutputFormat::Json => serde_json::to_string_pretty(portfolio),
    }
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn heading(out: &mut String, section: SectionId) {
    out.push_str(&format!("=== {} ===\n", section.title()));
}

fn format_human(portfolio: &Portfolio) -> String {
    let mut out = String::new();
    let profile = &portfolio.profile;

    out.push_str(&format!("{}\n", profile.name));
    let roles: Vec<&str> = portfolio.phrases.iter().collect();
    out.push_str(&format!("{}\n\n", roles.join(" · ")));
    out.push_str(&format!("{}\n\n", profile.summary));

    heading(&mut out, SectionId::About);
    for paragraph in &profile.about {
        out.push_str(&format!("{}\n\n", paragraph));
    }
    if let Some(resume) = &profile.resume_file {
        out.push_str(&format!("Résumé: {}\n\n", resume));
    }

    heading(&mut out, SectionId::Skills);
    for category in &portfolio.skills {
        out.push_str(&format!("{}: {}\n", category.title, category.skills.join(", ")));
    }
    out.push('\n');

    heading(&mut out, SectionId::Experience);
    for entry in &portfolio.experience {
        out.push_str(&format!("{} @ {} ({})\n", entry.role, entry.company, entry.period));
        for point in &entry.points {
            out.push_str(&format!("  ▸ {}\n", point));
        }
        out.push('\n');
    }

    heading(&mut out, SectionId::Projects);
    for project in &portfolio.projects {
        out.push_str(&format!("{}\n", project.title));
        out.push_str(&format!("  {}\n", project.description));
        out.push_str(&format!("  [{}]\n\n", project.tags.join("] [")));
    }

    heading(&mut out, SectionId::Certifications);
    for cert in &portfolio.certifications {
        out.push_str(&format!("{} - {}\n", cert.name, cert.issuer));
    }
    out.push('\n');

    heading(&mut out, SectionId::Education);
    for edu in &portfolio.education {
        out.push_str(&format!("{}, {} ({})\n", edu.degree, edu.institution, edu.period));
    }
    out.push('\n');

    heading(&mut out, SectionId::Contact);
    out.push_str(&format!("{}\n", portfolio.contact.message));
    out.push_str(&format!("Email: {}\n", portfolio.contact.email));
    if let Some(phone) = &portfolio.contact.phone {
        out.push_str(&format!("Phone: {}\n", phone));
    }

    if let Some(credit) = &portfolio.footer_credit {
        out.push_str(&format!("\n{}\n", credit));
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
