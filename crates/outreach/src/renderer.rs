//! Per-customer message rendering.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use pulse_core::types::{ClassifiedCustomer, RecencyBand};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::types::{MessageTemplate, TemplateStatus, TemplateVariable};

/// A message ready to copy into the retailer's messaging channel.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenderedMessage {
    pub template_id: Uuid,
    pub band: RecencyBand,
    pub customer_id: String,
    pub subject: String,
    pub body: String,
    pub rendered_at: DateTime<Utc>,
}

/// Render the template for one classified customer. Only active templates
/// render; drafts and archived templates return `None`.
pub fn render_for(
    template: &MessageTemplate,
    customer: &ClassifiedCustomer,
    store_name: &str,
) -> Option<RenderedMessage> {
    if template.status != TemplateStatus::Active {
        return None;
    }

    let variables = customer_variables(customer, store_name);
    Some(RenderedMessage {
        template_id: template.id,
        band: template.band,
        customer_id: customer.customer_id.clone(),
        subject: substitute(&template.subject, &variables, &template.variables),
        body: substitute(&template.body, &variables, &template.variables),
        rendered_at: Utc::now(),
    })
}

/// Substitution values derived from one classified customer. Greetings use
/// the first name only, the way the store writes to its customers.
fn customer_variables(customer: &ClassifiedCustomer, store_name: &str) -> HashMap<String, String> {
    let mut variables = HashMap::new();
    if let Some(first_name) = customer
        .customer_name
        .as_deref()
        .and_then(|name| name.split_whitespace().next())
    {
        variables.insert("name".to_string(), first_name.to_string());
    }
    if let Some(days) = customer.days_since_last_purchase {
        variables.insert("days".to_string(), days.to_string());
    }
    if let Some(date) = customer.last_purchase_date {
        variables.insert(
            "last_purchase_date".to_string(),
            date.format("%d/%m/%Y").to_string(),
        );
    }
    variables.insert("store".to_string(), store_name.to_string());
    variables
}

fn substitute(
    template_str: &str,
    variables: &HashMap<String, String>,
    var_defs: &[TemplateVariable],
) -> String {
    let mut result = template_str.to_string();
    for var_def in var_defs {
        let placeholder = format!("{{{{{}}}}}", var_def.name);
        let value = variables
            .get(&var_def.name)
            .cloned()
            .or_else(|| var_def.default_value.clone())
            .unwrap_or_default();
        result = result.replace(&placeholder, &value);
    }
    result
}
