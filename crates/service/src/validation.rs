//! Validation gate: checks a candidate payload against the field schema
//! before it is allowed to reach the store.
//!
//! Two modes: `Create` requires every mandatory field; `PartialUpdate`
//! checks only fields that are present. In both modes every check runs
//! and failures are collected into one field-path error map rather than
//! short-circuiting, so a client can fix an entire form in one round
//! trip. Unknown fields pass through untouched.

use serde_json::{Map, Value};

use models::category::{Category, SocialPlatform};
use models::payload::ServicePayload;
use models::record::{
    default_hero_text, Benefit, ContactInfo, Feature, ProcessStep, ProjectType, ServiceImage,
    SocialLink, DEFAULT_ICON, SHORT_DESCRIPTION_MAX_LEN, TITLE_MAX_LEN,
};
use models::user::validate_email;

use crate::errors::FieldErrors;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    PartialUpdate,
}

/// Payload that passed the gate: present fields are trimmed, parsed and
/// type-safe; absent fields stay `None` (create-mode defaults applied).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedPayload {
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub category: Option<Category>,
    pub price: Option<f64>,
    pub icon: Option<String>,
    pub price_note: Option<String>,
    pub hero_text: Option<String>,
    pub calendly_link: Option<String>,
    pub features: Option<Vec<Feature>>,
    pub process_steps: Option<Vec<ProcessStep>>,
    pub project_types: Option<Vec<ProjectType>>,
    pub benefits: Option<Vec<Benefit>>,
    pub social_links: Option<Vec<SocialLink>>,
    pub images: Option<Vec<ServiceImage>>,
    pub contact_info: Option<ContactInfo>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
    pub is_published: Option<bool>,
    pub change_reason: Option<String>,
    pub extra: Map<String, Value>,
}

/// Validate `payload` in the given mode. All checks run; any failure
/// blocks the whole operation.
pub fn validate(payload: &ServicePayload, mode: ValidationMode) -> Result<NormalizedPayload, FieldErrors> {
    let mut errors = FieldErrors::default();
    let mut out = NormalizedPayload { extra: payload.extra.clone(), ..Default::default() };

    out.title = required_text(&mut errors, "title", &payload.title, mode, Some(TITLE_MAX_LEN));
    out.short_description = required_text(
        &mut errors,
        "shortDescription",
        &payload.short_description,
        mode,
        Some(SHORT_DESCRIPTION_MAX_LEN),
    );
    out.description = required_text(&mut errors, "description", &payload.description, mode, None);
    out.full_description =
        required_text(&mut errors, "fullDescription", &payload.full_description, mode, None);

    match (&payload.category, mode) {
        (Some(raw), _) => match Category::parse(raw) {
            Ok(cat) => out.category = Some(cat),
            Err(_) => errors.push("category", format!("'{raw}' is not a valid category")),
        },
        (None, ValidationMode::Create) => errors.push("category", "category is required"),
        (None, ValidationMode::PartialUpdate) => {}
    }

    match payload.price {
        Some(p) if !p.is_finite() || p < 0.0 => {
            errors.push("price", "price must be a non-negative number");
        }
        Some(p) => out.price = Some(p),
        None if mode == ValidationMode::Create => out.price = Some(0.0),
        None => {}
    }

    out.icon = match trimmed(&payload.icon) {
        Some(icon) => Some(icon),
        None if mode == ValidationMode::Create => Some(DEFAULT_ICON.to_string()),
        None => None,
    };

    out.hero_text = match trimmed(&payload.hero_text) {
        Some(text) => Some(text),
        None if mode == ValidationMode::Create => out.title.as_deref().map(default_hero_text),
        None => None,
    };

    out.price_note = trimmed(&payload.price_note);
    out.change_reason = trimmed(&payload.change_reason);

    if let Some(link) = trimmed(&payload.calendly_link) {
        if is_url_shaped(&link) {
            out.calendly_link = Some(link);
        } else {
            errors.push("calendlyLink", "calendlyLink must be a valid http(s) URL");
        }
    }

    if let Some(inputs) = &payload.features {
        let mut items = Vec::with_capacity(inputs.len());
        for (i, f) in inputs.iter().enumerate() {
            let title = element_text(&mut errors, &format!("features[{i}].title"), &f.title);
            let description =
                element_text(&mut errors, &format!("features[{i}].description"), &f.description);
            if let (Some(title), Some(description)) = (title, description) {
                items.push(Feature { title, description, icon: trimmed(&f.icon) });
            }
        }
        out.features = Some(items);
    }

    if let Some(inputs) = &payload.process_steps {
        let mut items = Vec::with_capacity(inputs.len());
        for (i, s) in inputs.iter().enumerate() {
            let title = element_text(&mut errors, &format!("processSteps[{i}].title"), &s.title);
            let description =
                element_text(&mut errors, &format!("processSteps[{i}].description"), &s.description);
            let order = match s.order {
                Some(o) => Some(o),
                None => {
                    errors.push(format!("processSteps[{i}].order"), "order is required");
                    None
                }
            };
            if let (Some(title), Some(description), Some(order)) = (title, description, order) {
                items.push(ProcessStep { title, description, order });
            }
        }
        out.process_steps = Some(items);
    }

    if let Some(inputs) = &payload.project_types {
        let mut items = Vec::with_capacity(inputs.len());
        for (i, p) in inputs.iter().enumerate() {
            let name = element_text(&mut errors, &format!("projectTypes[{i}].name"), &p.name);
            let description =
                element_text(&mut errors, &format!("projectTypes[{i}].description"), &p.description);
            if let (Some(name), Some(description)) = (name, description) {
                items.push(ProjectType { name, description });
            }
        }
        out.project_types = Some(items);
    }

    if let Some(inputs) = &payload.benefits {
        let mut items = Vec::with_capacity(inputs.len());
        for (i, b) in inputs.iter().enumerate() {
            let title = element_text(&mut errors, &format!("benefits[{i}].title"), &b.title);
            let description =
                element_text(&mut errors, &format!("benefits[{i}].description"), &b.description);
            if let (Some(title), Some(description)) = (title, description) {
                items.push(Benefit { title, description, icon: trimmed(&b.icon) });
            }
        }
        out.benefits = Some(items);
    }

    if let Some(inputs) = &payload.social_links {
        let mut items = Vec::with_capacity(inputs.len());
        for (i, link) in inputs.iter().enumerate() {
            let platform = match trimmed(&link.platform) {
                Some(raw) => match SocialPlatform::parse(&raw) {
                    Ok(p) => Some(p),
                    Err(_) => {
                        errors.push(
                            format!("socialLinks[{i}].platform"),
                            format!("'{raw}' is not a supported platform"),
                        );
                        None
                    }
                },
                None => {
                    errors.push(format!("socialLinks[{i}].platform"), "platform is required");
                    None
                }
            };
            let url = match trimmed(&link.url) {
                Some(u) if is_url_shaped(&u) => Some(u),
                Some(_) => {
                    errors.push(format!("socialLinks[{i}].url"), "url must be a valid http(s) URL");
                    None
                }
                None => {
                    errors.push(format!("socialLinks[{i}].url"), "url is required");
                    None
                }
            };
            if let (Some(platform), Some(url)) = (platform, url) {
                items.push(SocialLink { platform, url });
            }
        }
        out.social_links = Some(items);
    }

    if let Some(inputs) = &payload.images {
        let mut items = Vec::with_capacity(inputs.len());
        for (i, img) in inputs.iter().enumerate() {
            match trimmed(&img.url) {
                Some(url) => items.push(ServiceImage {
                    url,
                    alt_text: trimmed(&img.alt_text),
                    is_primary: img.is_primary.unwrap_or(false),
                }),
                None => errors.push(format!("images[{i}].url"), "url is required"),
            }
        }
        out.images = Some(items);
    }

    if let Some(info) = &payload.contact_info {
        let mut normalized = ContactInfo::default();
        if let Some(email) = trimmed(&info.email) {
            if validate_email(&email).is_ok() {
                normalized.email = Some(email);
            } else {
                errors.push("contactInfo.email", "email address is not valid");
            }
        }
        if let Some(phone) = trimmed(&info.phone) {
            if is_phone_shaped(&phone) {
                normalized.phone = Some(phone);
            } else {
                errors.push("contactInfo.phone", "phone number is not valid");
            }
        }
        if let Some(website) = trimmed(&info.website) {
            if is_url_shaped(&website) {
                normalized.website = Some(website);
            } else {
                errors.push("contactInfo.website", "website must be a valid http(s) URL");
            }
        }
        out.contact_info = Some(normalized);
    }

    out.is_featured = payload.is_featured;
    out.is_active = payload.is_active;
    out.is_published = payload.is_published;

    if errors.is_empty() {
        Ok(out)
    } else {
        Err(errors)
    }
}

fn trimmed(field: &Option<String>) -> Option<String> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// A required scalar: must be present in create mode, and must not be
/// blank in either mode when present.
fn required_text(
    errors: &mut FieldErrors,
    path: &str,
    field: &Option<String>,
    mode: ValidationMode,
    max_len: Option<usize>,
) -> Option<String> {
    match (field, mode) {
        (Some(raw), _) => {
            let value = raw.trim();
            if value.is_empty() {
                errors.push(path, format!("{path} must not be blank"));
                return None;
            }
            if let Some(max) = max_len {
                if value.chars().count() > max {
                    errors.push(path, format!("{path} must be at most {max} characters"));
                    return None;
                }
            }
            Some(value.to_string())
        }
        (None, ValidationMode::Create) => {
            errors.push(path, format!("{path} is required"));
            None
        }
        (None, ValidationMode::PartialUpdate) => None,
    }
}

fn element_text(errors: &mut FieldErrors, path: &str, field: &Option<String>) -> Option<String> {
    match field.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(v) => Some(v.to_string()),
        None => {
            let name = path.rsplit('.').next().unwrap_or(path);
            errors.push(path, format!("{name} is required"));
            None
        }
    }
}

fn is_url_shaped(s: &str) -> bool {
    (s.starts_with("http://") || s.starts_with("https://")) && s.len() > 8
}

fn is_phone_shaped(s: &str) -> bool {
    let digits: String =
        s.chars().filter(|c| !matches!(c, ' ' | '(' | ')' | '-' | '+' | '.')).collect();
    digits.len() >= 7 && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::payload::{FeatureInput, SocialLinkInput};

    fn full_payload() -> ServicePayload {
        ServicePayload {
            title: Some("Environmental Audit Services!".into()),
            short_description: Some("Independent audits".into()),
            description: Some("We audit environmental compliance.".into()),
            full_description: Some("Long form description.".into()),
            category: Some("audit".into()),
            price: Some(2500.0),
            ..Default::default()
        }
    }

    #[test]
    fn create_accepts_full_payload_and_applies_defaults() {
        let normalized = validate(&full_payload(), ValidationMode::Create).unwrap();
        assert_eq!(normalized.category, Some(Category::Audit));
        assert_eq!(normalized.icon.as_deref(), Some(DEFAULT_ICON));
        assert_eq!(
            normalized.hero_text.as_deref(),
            Some("Professional Environmental Audit Services! services for your business")
        );
        assert_eq!(normalized.price, Some(2500.0));
    }

    #[test]
    fn create_missing_category_reports_category_key() {
        let mut p = full_payload();
        p.category = None;
        let errs = validate(&p, ValidationMode::Create).unwrap_err();
        assert!(errs.contains("category"));
    }

    #[test]
    fn negative_price_reports_price_key() {
        let mut p = full_payload();
        p.price = Some(-5.0);
        let errs = validate(&p, ValidationMode::Create).unwrap_err();
        assert!(errs.contains("price"));
    }

    #[test]
    fn errors_are_collected_not_short_circuited() {
        let p = ServicePayload {
            title: Some("x".repeat(101)),
            price: Some(-1.0),
            category: Some("gardening".into()),
            ..Default::default()
        };
        let errs = validate(&p, ValidationMode::Create).unwrap_err();
        assert!(errs.contains("title"));
        assert!(errs.contains("price"));
        assert!(errs.contains("category"));
        assert!(errs.contains("description"));
        assert!(errs.contains("shortDescription"));
    }

    #[test]
    fn partial_update_checks_only_present_fields() {
        let p = ServicePayload { price: Some(10.0), ..Default::default() };
        let normalized = validate(&p, ValidationMode::PartialUpdate).unwrap();
        assert_eq!(normalized.price, Some(10.0));
        assert!(normalized.title.is_none());

        let blank = ServicePayload { title: Some("  ".into()), ..Default::default() };
        let errs = validate(&blank, ValidationMode::PartialUpdate).unwrap_err();
        assert!(errs.contains("title"));
    }

    #[test]
    fn nested_elements_report_indexed_paths() {
        let mut p = full_payload();
        p.features = Some(vec![
            FeatureInput {
                title: Some("Report".into()),
                description: Some("A thorough report".into()),
                icon: None,
            },
            FeatureInput { title: None, description: Some("desc".into()), icon: None },
            FeatureInput { title: Some("Follow-up".into()), description: None, icon: None },
        ]);
        let errs = validate(&p, ValidationMode::Create).unwrap_err();
        assert!(errs.contains("features[1].title"));
        assert!(errs.contains("features[2].description"));
        assert!(!errs.contains("features[0].title"));
    }

    #[test]
    fn social_links_validate_platform_and_url() {
        let mut p = full_payload();
        p.social_links = Some(vec![
            SocialLinkInput {
                platform: Some("linkedin".into()),
                url: Some("https://linkedin.com/company/x".into()),
            },
            SocialLinkInput { platform: Some("myspace".into()), url: Some("ftp://x".into()) },
        ]);
        let errs = validate(&p, ValidationMode::Create).unwrap_err();
        assert!(errs.contains("socialLinks[1].platform"));
        assert!(errs.contains("socialLinks[1].url"));
    }

    #[test]
    fn contact_info_fields_validated_when_non_empty() {
        let mut p = full_payload();
        p.contact_info = Some(ContactInfo {
            email: Some("not-an-email".into()),
            phone: Some("12".into()),
            website: Some("example.com".into()),
        });
        let errs = validate(&p, ValidationMode::Create).unwrap_err();
        assert!(errs.contains("contactInfo.email"));
        assert!(errs.contains("contactInfo.phone"));
        assert!(errs.contains("contactInfo.website"));

        p.contact_info = Some(ContactInfo {
            email: Some("ops@firm.example".into()),
            phone: Some("+1 (555) 010-2030".into()),
            website: Some("https://firm.example".into()),
        });
        assert!(validate(&p, ValidationMode::Create).is_ok());
    }

    #[test]
    fn unknown_fields_pass_through() {
        let mut p = full_payload();
        p.extra.insert("futureField".into(), serde_json::json!({"a": 1}));
        let normalized = validate(&p, ValidationMode::Create).unwrap();
        assert_eq!(normalized.extra["futureField"]["a"], 1);
    }
}
