//! Portfolio content: the built-in résumé and JSON loading.
//!
//! A content file uses the same schema `portfolio print --format json`
//! emits, so the built-in data doubles as a template.

use std::fs;
use std::path::Path;

use crate::error::ContentError;
use crate::types::{
    AnalyticsConfig, Certification, Contact, Education, ExperienceEntry, Portfolio, PhraseList,
    Profile, Project, SkillCategory,
};

/// Load portfolio content from a JSON file.
///
/// Fails fast: a missing file, malformed JSON or an invalid phrase list all
/// reject the content before any UI starts.
pub fn load_portfolio(path: &Path) -> Result<Portfolio, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load from `path` when given, otherwise use the built-in content.
pub fn resolve_portfolio(path: Option<&Path>) -> Result<Portfolio, ContentError> {
    match path {
        Some(p) => load_portfolio(p),
        None => builtin_portfolio(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The built-in résumé.
pub fn builtin_portfolio() -> Result<Portfolio, ContentError> {
    let phrases = PhraseList::new([
        "Data Privacy Manager",
        "InfoSec Practitioner",
        "GRC Specialist",
    ])?;

    Ok(Portfolio {
        profile: Profile {
            name: "Samuel Owusu".into(),
            initials: "SO".into(),
            greeting: "Hi, my name is".into(),
            summary: "A seasoned Information Security and Data Privacy practitioner with deep \
                      expertise in building enterprise privacy programs, engineering data \
                      protection solutions, and governing sensitive information across complex \
                      environments."
                .into(),
            about: strings(&[
                "I am a Senior Data Privacy Manager and Information Security Practitioner with \
                 extensive experience in developing and executing data governance strategies. \
                 I specialize in bridging legal, technical, and business domains to deliver \
                 secure, compliant, and privacy-preserving systems.",
                "My expertise covers regulatory compliance (GDPR, CCPA, HIPAA), data \
                 management, and the implementation of privacy-preserving technologies like \
                 tokenization and encryption. I have a proven track record of leading GRC \
                 programs and enhancing organizational security maturity.",
            ]),
            resume_file: Some("Samuel_Owusu_Resume.pdf".into()),
        },
        phrases,
        skills: vec![
            SkillCategory {
                title: "Governance & Compliance".into(),
                skills: strings(&[
                    "GDPR",
                    "CCPA",
                    "HIPAA",
                    "Data Governance",
                    "Data Stewardship",
                    "Regulatory Compliance",
                ]),
            },
            SkillCategory {
                title: "Privacy Engineering".into(),
                skills: strings(&[
                    "Privacy-by-Design",
                    "Tokenization",
                    "Anonymization",
                    "Encryption",
                    "Identity Access Mgmt",
                    "Data Mapping",
                ]),
            },
            SkillCategory {
                title: "Risk Management".into(),
                skills: strings(&[
                    "Risk Assessments",
                    "Vendor Risk",
                    "Internal Audit",
                    "DPIA / PIA",
                    "Incident Response",
                    "Breach Mitigation",
                ]),
            },
            SkillCategory {
                title: "Data Management Tools".into(),
                skills: strings(&[
                    "Data Catalogs",
                    "Metadata Management",
                    "Data Quality Tools",
                    "Cloud Platforms",
                    "Data Lifecycle",
                    "Analytics",
                ]),
            },
        ],
        experience: vec![
            ExperienceEntry {
                company: "VA Dept of Social Services".into(),
                role: "Sr. Data Privacy Manager".into(),
                period: "04/2020 - Present".into(),
                points: strings(&[
                    "Led the development and implementation of a GRC program that increased \
                     compliance alignment by 40% across regulatory frameworks.",
                    "Established an enterprise-wide data governance framework and data \
                     stewardship model, improving data quality scores by 35%.",
                    "Implemented the organization's first centralized data catalog, increasing \
                     data discoverability by 60%.",
                    "Deployed privacy-preserving technologies (tokenization, anonymization, \
                     encryption) reducing sensitive data exposure by 70%.",
                    "Built a complete privacy compliance program aligned with GDPR, CCPA, and \
                     HIPAA, reducing regulatory exposure by 40%.",
                ]),
            },
            ExperienceEntry {
                company: "Dept of Motor Vehicles".into(),
                role: "Senior IT Auditor".into(),
                period: "03/2017 - 04/2020".into(),
                points: strings(&[
                    "Supported over 50 risk assessment and IT audit projects, identifying \
                     critical vulnerabilities and threats.",
                    "Decreased risk exposure by over 30% across various platforms through \
                     strategic mitigations.",
                    "Led compliance audit engagements leading to certifications.",
                    "Briefed senior leaders on the threat landscape and recommended Security \
                     Strategy.",
                    "Reviewed and assessed risk of cloud service providers and maintained \
                     vendor risk assessments.",
                ]),
            },
            ExperienceEntry {
                company: "Baltimore City College".into(),
                role: "InfoSec Risk Specialist".into(),
                period: "02/2015 - 03/2017".into(),
                points: strings(&[
                    "Executed comprehensive application security strategy incorporating \
                     secure coding and continuous monitoring.",
                    "Achieved 30% reduction in critical vulnerabilities across all major \
                     applications.",
                    "Ensured compliance with stringent industry standards, notably OWASP Top 10.",
                    "Performed quantitative and qualitative risk assessments and mitigated \
                     identified risks.",
                    "Evaluated vulnerabilities of third-party applications.",
                ]),
            },
            ExperienceEntry {
                company: "Kohls".into(),
                role: "Support Analyst (Part-time)".into(),
                period: "09/2013 - 02/2015".into(),
                points: strings(&[
                    "Supported Cloud and non-cloud privacy programs and due diligence programs.",
                    "Created schedules to perform annual security assessments of sensitive \
                     systems.",
                    "Developed security policies and ensured their continuous update.",
                    "Supported the implementation and administration of privacy management \
                     technology.",
                ]),
            },
        ],
        projects: vec![
            Project {
                title: "Enterprise GRC Program Implementation".into(),
                description: "Led the development and implementation of a GRC program that \
                              increased compliance alignment by 40% across regulatory frameworks \
                              and internal standards, reducing organizational risk exposure."
                    .into(),
                tags: strings(&["GRC", "Compliance", "Risk Reduction", "Strategic Leadership"]),
            },
            Project {
                title: "Data Governance & Cataloging".into(),
                description: "Established an enterprise-wide data governance framework and \
                              implemented the organization's first centralized data catalog, \
                              increasing data discoverability by 60% and improving quality \
                              scores by 35%."
                    .into(),
                tags: strings(&["Data Governance", "Data Catalog", "Data Quality", "Metadata"]),
            },
            Project {
                title: "Privacy-Preserving Tech Architecture".into(),
                description: "Designed and deployed technologies such as tokenization, \
                              anonymization, and encryption across three enterprise platforms, \
                              successfully reducing sensitive data exposure by 70%."
                    .into(),
                tags: strings(&[
                    "Encryption",
                    "Tokenization",
                    "Privacy Engineering",
                    "Security Architecture",
                ]),
            },
        ],
        certifications: vec![
            Certification {
                name: "CISSP - Certified Information Systems Security Professional".into(),
                issuer: "ISC2".into(),
            },
            Certification {
                name: "CISM - Certified Information Security Manager".into(),
                issuer: "ISACA".into(),
            },
            Certification {
                name: "CISA - Certified Information Systems Auditor".into(),
                issuer: "ISACA".into(),
            },
            Certification {
                name: "CIPT - Certified Information Privacy Technologist".into(),
                issuer: "IAPP".into(),
            },
            Certification {
                name: "CompTIA Security+".into(),
                issuer: "CompTIA".into(),
            },
        ],
        education: vec![
            Education {
                institution: "Marymount University, Arlington, VA".into(),
                degree: "DSc. Cybersecurity".into(),
                period: "May 2023".into(),
            },
            Education {
                institution: "University of Maryland, Baltimore County".into(),
                degree: "M.Sc. in Information Systems".into(),
                period: "December 2013".into(),
            },
            Education {
                institution: "University of Education, Winneba, Ghana".into(),
                degree: "Bachelor of Education".into(),
                period: "June 2005".into(),
            },
        ],
        contact: Contact {
            message: "I'm currently seeking new opportunities and my inbox is always open. \
                      Whether you have a question or just want to say hi, I'll try my best to \
                      get back to you!"
                .into(),
            email: "owusamuel01@gmail.com".into(),
            phone: None,
        },
        footer_credit: Some("Built by Techxplorers PVT limited".into()),
        analytics: Some(AnalyticsConfig {
            measurement_id: "G-YJHX88C1NW".into(),
            app_id: None,
            project_id: Some("samuel-director-portfolio".into()),
        }),
    })
}
