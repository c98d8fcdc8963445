//! Organization provisioning

use crate::context::ScenarioContext;
use crate::error::ScenarioError;
use crate::identity::{AdminUser, IdentityContext, Organization};
use crate::random::ValueGenerator;
use crate::rest::{self, rest_url};
use aviation_load_http::Headers;
use serde_json::json;
use tracing::debug;

pub const CHECK_ORGANIZATION_CREATED: &str = "organization created";

pub const EMAIL_DOMAIN: &str = "mycompany.com";

/// Create a fresh organization with a random admin account on the auth service at `base_url`.
///
/// Returns the server-assigned ids together with the credentials we generated.
/// A response without `organization.id`, `organization.schema_name` or
/// `admin_user.id` is fatal for the caller.
pub async fn create_organization(
    ctx: &ScenarioContext,
    random: &mut ValueGenerator,
    base_url: &str,
) -> Result<IdentityContext, ScenarioError> {
    let name = random.organization_name();
    let username = random.string(8);
    let password = random.password();
    let email = random.email(EMAIL_DOMAIN);

    let body = json!({
        "name": name,
        "schema_name": name,
        "admin": {
            "username": username,
            "email": email,
            "password": password,
        }
    });

    let url = rest_url(base_url, "/api/organizations/create/");
    debug!(url = %url, organization = %name, "Creating organization");
    let response = rest::post(ctx, &url, Headers::new(), &body).await;

    ctx.check(
        CHECK_ORGANIZATION_CREATED,
        rest::status_with_field(response.as_ref(), 201, "organization.id"),
    );

    let response = response
        .ok_or_else(|| ScenarioError::Provisioning("no response from auth service".to_string()))?;

    let missing = |field: &str| {
        ScenarioError::Provisioning(format!(
            "response (status {}) has no {}",
            response.status, field
        ))
    };
    let org_id = response
        .json_string("organization.id")
        .ok_or_else(|| missing("organization.id"))?;
    let schema_name = response
        .json_string("organization.schema_name")
        .ok_or_else(|| missing("organization.schema_name"))?;
    let admin_id = response
        .json_string("admin_user.id")
        .ok_or_else(|| missing("admin_user.id"))?;

    debug!(organization_id = %org_id, admin_id = %admin_id, "Organization provisioned");

    Ok(IdentityContext {
        organization: Organization {
            id: org_id,
            name,
            schema_name,
        },
        admin: AdminUser {
            id: admin_id,
            username,
            password,
            email,
        },
    })
}
