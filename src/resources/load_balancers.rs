//! Load balancer resource handler.
//!
//! Covers the `/v2/load-balancers` endpoint family: the load balancers
//! themselves, their forwarding rules, and instance attachment. Like every
//! resource handler, it is a mechanical caller of [`Dispatch`].

use serde::{Deserialize, Serialize};

use crate::clients::{ApiRequest, ClientError, Dispatch, HttpMethod, ListOptions, Meta};

const LOAD_BALANCERS_PATH: &str = "/v2/load-balancers";

/// A load balancer instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    /// Opaque identifier assigned by the provider.
    pub id: String,
    /// Caller-assigned display label.
    #[serde(default)]
    pub label: String,
    /// Region the balancer runs in.
    #[serde(default)]
    pub region: String,
    /// Lifecycle status (e.g. `pending`, `active`).
    #[serde(default)]
    pub status: String,
    /// Public IPv4 address, once provisioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    /// Public IPv6 address, once provisioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    /// Creation timestamp, as an opaque provider-formatted string.
    #[serde(default)]
    pub created_at: String,
    /// Traffic distribution algorithm (e.g. `roundrobin`, `leastconn`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balancing_algorithm: Option<String>,
    /// Whether HTTP traffic is redirected to HTTPS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_redirect: Option<bool>,
    /// Forwarding rules currently configured.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forwarding_rules: Vec<ForwardingRule>,
    /// Identifiers of the instances behind this balancer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instances: Vec<String>,
}

/// A single frontend-to-backend forwarding rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardingRule {
    /// Rule identifier, assigned by the provider on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Protocol the balancer listens on.
    #[serde(default)]
    pub frontend_protocol: String,
    /// Port the balancer listens on.
    #[serde(default)]
    pub frontend_port: u16,
    /// Protocol used towards the backends.
    #[serde(default)]
    pub backend_protocol: String,
    /// Port used towards the backends.
    #[serde(default)]
    pub backend_port: u16,
}

/// Health check settings for a load balancer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Protocol used for the check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Port probed on each backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Request path, for HTTP(S) checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Seconds between checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_interval: Option<u32>,
    /// Seconds before a check counts as failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_timeout: Option<u32>,
    /// Failures before a backend is pulled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unhealthy_threshold: Option<u32>,
    /// Successes before a backend is restored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy_threshold: Option<u32>,
}

/// Request body for creating a load balancer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerCreateRequest {
    /// Display label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Region to create the balancer in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Traffic distribution algorithm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balancing_algorithm: Option<String>,
    /// Redirect HTTP traffic to HTTPS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_redirect: Option<bool>,
    /// Health check settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    /// Initial forwarding rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarding_rules: Option<Vec<ForwardingRule>>,
    /// Instances to attach immediately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances: Option<Vec<String>>,
}

/// Request body for a partial load balancer update.
///
/// Omitted fields are left unchanged on the server; explicit empty values
/// clear the corresponding setting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerUpdateRequest {
    /// New display label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// New traffic distribution algorithm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balancing_algorithm: Option<String>,
    /// Enable or disable the HTTPS redirect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_redirect: Option<bool>,
    /// Replacement health check settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    /// Replacement forwarding rules; an explicit empty list removes all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarding_rules: Option<Vec<ForwardingRule>>,
}

/// Request body for attaching instances to a load balancer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachInstancesRequest {
    /// Identifiers of the instances to attach.
    pub instances: Vec<String>,
}

#[derive(Deserialize)]
struct LoadBalancersEnvelope {
    load_balancers: Vec<LoadBalancer>,
    meta: Option<Meta>,
}

#[derive(Deserialize)]
struct LoadBalancerEnvelope {
    load_balancer: LoadBalancer,
}

#[derive(Deserialize)]
struct ForwardingRulesEnvelope {
    forwarding_rules: Vec<ForwardingRule>,
    meta: Option<Meta>,
}

/// Handler for the load balancer endpoints.
#[derive(Clone, Copy, Debug)]
pub struct LoadBalancerHandler<'a, D> {
    dispatcher: &'a D,
}

impl<'a, D: Dispatch> LoadBalancerHandler<'a, D> {
    /// Creates a handler borrowing the given dispatcher.
    #[must_use]
    pub const fn new(dispatcher: &'a D) -> Self {
        Self { dispatcher }
    }

    /// Lists load balancers on the account, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn list(
        &self,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<LoadBalancer>, Option<Meta>), ClientError> {
        let mut builder = ApiRequest::builder(HttpMethod::Get, LOAD_BALANCERS_PATH);
        if let Some(options) = options {
            builder = builder.query_pairs(options.to_query_pairs());
        }

        let envelope: LoadBalancersEnvelope = self.dispatcher.dispatch(builder.build()?).await?;
        Ok((envelope.load_balancers, envelope.meta))
    }

    /// Fetches a single load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn get(&self, load_balancer_id: &str) -> Result<LoadBalancer, ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Get,
            format!("{LOAD_BALANCERS_PATH}/{load_balancer_id}"),
        )
        .build()?;

        let envelope: LoadBalancerEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.load_balancer)
    }

    /// Creates a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn create(
        &self,
        request: &LoadBalancerCreateRequest,
    ) -> Result<LoadBalancer, ClientError> {
        let request = ApiRequest::builder(HttpMethod::Post, LOAD_BALANCERS_PATH)
            .json(request)?
            .build()?;

        let envelope: LoadBalancerEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.load_balancer)
    }

    /// Applies a partial update to a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn update(
        &self,
        load_balancer_id: &str,
        request: &LoadBalancerUpdateRequest,
    ) -> Result<LoadBalancer, ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Patch,
            format!("{LOAD_BALANCERS_PATH}/{load_balancer_id}"),
        )
        .json(request)?
        .build()?;

        let envelope: LoadBalancerEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.load_balancer)
    }

    /// Deletes a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn delete(&self, load_balancer_id: &str) -> Result<(), ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Delete,
            format!("{LOAD_BALANCERS_PATH}/{load_balancer_id}"),
        )
        .build()?;

        self.dispatcher.dispatch_empty(request).await
    }

    /// Lists the forwarding rules configured on a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn list_forwarding_rules(
        &self,
        load_balancer_id: &str,
    ) -> Result<(Vec<ForwardingRule>, Option<Meta>), ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Get,
            format!("{LOAD_BALANCERS_PATH}/{load_balancer_id}/forwarding-rules"),
        )
        .build()?;

        let envelope: ForwardingRulesEnvelope = self.dispatcher.dispatch(request).await?;
        Ok((envelope.forwarding_rules, envelope.meta))
    }

    /// Attaches instances to a load balancer.
    ///
    /// The API acknowledges with an empty body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn attach_instances(
        &self,
        load_balancer_id: &str,
        request: &AttachInstancesRequest,
    ) -> Result<(), ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Post,
            format!("{LOAD_BALANCERS_PATH}/{load_balancer_id}/instances/attach"),
        )
        .json(request)?
        .build()?;

        self.dispatcher.dispatch_empty(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_omits_unset_fields() {
        let request = LoadBalancerCreateRequest {
            label: Some("edge-lb".to_string()),
            region: Some("ewr".to_string()),
            ..LoadBalancerCreateRequest::default()
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"label": "edge-lb", "region": "ewr"})
        );
    }

    #[test]
    fn test_update_request_explicit_empty_rules_clears() {
        let request = LoadBalancerUpdateRequest {
            forwarding_rules: Some(Vec::new()),
            ..LoadBalancerUpdateRequest::default()
        };

        // An explicit empty list must reach the wire; an omitted one must not.
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"forwarding_rules": []})
        );
        assert_eq!(
            serde_json::to_value(LoadBalancerUpdateRequest::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_update_request_explicit_false_is_serialized() {
        let request = LoadBalancerUpdateRequest {
            ssl_redirect: Some(false),
            ..LoadBalancerUpdateRequest::default()
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"ssl_redirect": false})
        );
    }

    #[test]
    fn test_load_balancer_deserialization_from_api_response() {
        let json = r#"{
            "id": "lb-7c21",
            "label": "edge-lb",
            "region": "ewr",
            "status": "active",
            "ipv4": "203.0.113.10",
            "created_at": "2026-04-12T09:30:00Z",
            "balancing_algorithm": "roundrobin",
            "ssl_redirect": true,
            "forwarding_rules": [
                {
                    "id": "rule-1",
                    "frontend_protocol": "https",
                    "frontend_port": 443,
                    "backend_protocol": "http",
                    "backend_port": 8080
                }
            ],
            "instances": ["inst-1", "inst-2"],
            "generation": 2
        }"#;

        let lb: LoadBalancer = serde_json::from_str(json).unwrap();

        assert_eq!(lb.id, "lb-7c21");
        assert_eq!(lb.ipv4.as_deref(), Some("203.0.113.10"));
        assert!(lb.ipv6.is_none());
        assert_eq!(lb.forwarding_rules.len(), 1);
        assert_eq!(lb.forwarding_rules[0].frontend_port, 443);
        assert_eq!(lb.instances.len(), 2);
    }

    #[test]
    fn test_forwarding_rule_without_id_serializes_for_create() {
        let rule = ForwardingRule {
            id: None,
            frontend_protocol: "https".to_string(),
            frontend_port: 443,
            backend_protocol: "http".to_string(),
            backend_port: 8080,
        };

        let value = serde_json::to_value(&rule).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["frontend_port"], 443);
    }

    #[test]
    fn test_collection_envelope_carries_meta() {
        let envelope: LoadBalancersEnvelope = serde_json::from_value(json!({
            "load_balancers": [{"id": "lb-1"}],
            "meta": {"total": 1, "links": {"next": "", "prev": ""}}
        }))
        .unwrap();

        assert_eq!(envelope.load_balancers.len(), 1);
        assert_eq!(envelope.meta.unwrap().total, 1);
    }
}
