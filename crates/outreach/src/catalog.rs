//! Template catalog keyed by recency band.

use std::collections::HashMap;

use chrono::Utc;
use pulse_core::types::RecencyBand;
use uuid::Uuid;

use crate::types::{MessageTemplate, TemplateStatus, TemplateVariable};

pub struct TemplateCatalog {
    templates: HashMap<RecencyBand, MessageTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Register (or replace) the template for its band. Returns the id.
    pub fn register(&mut self, template: MessageTemplate) -> Uuid {
        let id = template.id;
        self.templates.insert(template.band, template);
        id
    }

    pub fn get(&self, band: RecencyBand) -> Option<&MessageTemplate> {
        self.templates.get(&band)
    }

    /// All templates in ascending band order.
    pub fn list(&self) -> Vec<&MessageTemplate> {
        let mut templates: Vec<&MessageTemplate> = self.templates.values().collect();
        templates.sort_by_key(|template| template.band);
        templates
    }

    /// Built-in catalog with one active template per band.
    pub fn default_catalog() -> Self {
        let mut catalog = Self::new();
        for (band, subject, body) in default_copy() {
            catalog.register(MessageTemplate {
                id: Uuid::new_v4(),
                band,
                subject: subject.to_string(),
                body: body.to_string(),
                variables: standard_variables(),
                status: TemplateStatus::Active,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
        }
        catalog
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn standard_variables() -> Vec<TemplateVariable> {
    vec![
        TemplateVariable {
            name: "name".to_string(),
            default_value: Some("there".to_string()),
            required: false,
        },
        TemplateVariable {
            name: "days".to_string(),
            default_value: Some("a while".to_string()),
            required: false,
        },
        TemplateVariable {
            name: "last_purchase_date".to_string(),
            default_value: Some("N/A".to_string()),
            required: false,
        },
        TemplateVariable {
            name: "store".to_string(),
            default_value: None,
            required: true,
        },
    ]
}

fn default_copy() -> [(RecencyBand, &'static str, &'static str); 6] {
    [
        (
            RecencyBand::New,
            "Thank you for your recent purchase at {{store}}!",
            "Hi {{name}},\n\n\
             We hope you are enjoying your recent purchase from {{store}}!\n\n\
             Thank you for your trust in our products. Your last purchase was on {{last_purchase_date}}.\n\n\
             New arrivals that pair well with what you bought are landing soon. How about a look at our catalog?\n\n\
             We are here for any questions or suggestions.\n\n\
             Warm regards,\n\
             The {{store}} team",
        ),
        (
            RecencyBand::Active,
            "We miss you at {{store}}!",
            "Hi {{name}},\n\n\
             We noticed it has been {{days}} days since your last visit to {{store}}.\n\n\
             Your last purchase was on {{last_purchase_date}}, and our catalog is full of new items you might like.\n\n\
             How about stopping by again? We have exclusive pieces that match your style!\n\n\
             Warm regards,\n\
             The {{store}} team",
        ),
        (
            RecencyBand::Cooling,
            "Come back and see us at {{store}}",
            "Hi {{name}},\n\n\
             We miss you! It has been {{days}} days since your last purchase at {{store}}.\n\n\
             Our newest collection just arrived, and we are sure you will love it.\n\n\
             As a valued customer, we have prepared a little surprise for your next purchase. Come check it out!\n\n\
             Warm regards,\n\
             The {{store}} team",
        ),
        (
            RecencyBand::AtRisk,
            "A special offer to welcome you back to {{store}}",
            "Hi {{name}},\n\n\
             It has been a while since your last visit to {{store}} ({{days}} days).\n\n\
             We would love to have you back, so we prepared an exclusive offer just for you.\n\n\
             Show this email on your next purchase and get 10% off any product in the store.\n\n\
             We look forward to seeing you again!\n\n\
             Warm regards,\n\
             The {{store}} team",
        ),
        (
            RecencyBand::Dormant,
            "A lot has changed at {{store}} since your last visit",
            "Hi {{name}},\n\n\
             It has been {{days}} days since your last purchase, and {{store}} has plenty of news to show you.\n\n\
             Our catalog has been refreshed from top to bottom, and a welcome-back gift is waiting with your next order.\n\n\
             Show this email in store and get 10% off, plus a small surprise at checkout.\n\n\
             Warm regards,\n\
             The {{store}} team",
        ),
        (
            RecencyBand::Lost,
            "We want to win you back! An exclusive offer from {{store}}",
            "Hi {{name}},\n\n\
             It has been more than a year since your last purchase at {{store}}, and we would truly love to have you back!\n\n\
             Our catalog has been completely renewed, and we are sure the new collection will surprise you.\n\n\
             As a special gesture, enjoy 15% off your next purchase. Just mention this email.\n\n\
             It would make us very happy to see you again!\n\n\
             Warm regards,\n\
             The {{store}} team",
        ),
    ]
}
