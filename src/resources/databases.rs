//! Managed database resource handler.
//!
//! This module covers the `/v2/databases` endpoint family: the database
//! subscriptions themselves, their users, and the maintenance and version
//! upgrade actions. The handler is a thin, mechanical caller of
//! [`Dispatch`]; it owns the paths and envelope shapes and nothing else.
//!
//! # Example
//!
//! ```rust,ignore
//! use nimbus_api::resources::DatabaseHandler;
//! use nimbus_api::{ListOptions, Meta};
//!
//! let databases = DatabaseHandler::new(&client);
//!
//! // List with a label filter
//! let options = ListOptions {
//!     label: Some("prod".to_string()),
//!     ..ListOptions::default()
//! };
//! let (page, meta) = databases.list(Some(&options)).await?;
//!
//! // Partial update: only the label changes, everything else is untouched
//! let update = DatabaseUpdateRequest {
//!     label: Some("prod-primary".to_string()),
//!     ..DatabaseUpdateRequest::default()
//! };
//! let database = databases.update("9b0a8f", &update).await?;
//! ```

use serde::{Deserialize, Serialize};

use crate::clients::{
    ApiRequest, ClientError, Dispatch, HttpMethod, ListOptions, MessageEnvelope, Meta,
};

const DATABASES_PATH: &str = "/v2/databases";

/// A managed database subscription.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Opaque identifier assigned by the provider.
    pub id: String,
    /// Caller-assigned display label.
    #[serde(default)]
    pub label: String,
    /// Region the cluster runs in.
    #[serde(default)]
    pub region: String,
    /// Plan identifier the subscription was created with.
    #[serde(default)]
    pub plan: String,
    /// Lifecycle status (e.g. `pending`, `running`).
    #[serde(default)]
    pub status: String,
    /// Database engine (e.g. `pg`, `mysql`).
    #[serde(default)]
    pub engine: String,
    /// Engine major version.
    #[serde(default)]
    pub engine_version: String,
    /// Hostname for client connections.
    #[serde(default)]
    pub host: String,
    /// Port for client connections, as issued by the provider.
    #[serde(default)]
    pub port: String,
    /// Administrative username.
    #[serde(default)]
    pub username: String,
    /// Administrative password.
    #[serde(default)]
    pub password: String,
    /// Creation timestamp, as an opaque provider-formatted string.
    #[serde(default)]
    pub created_at: String,
    /// Day of week for the maintenance window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_dow: Option<String>,
    /// Start time for the maintenance window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_time: Option<String>,
    /// Timestamp of the most recent backup, if one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_backup: Option<String>,
    /// Caller-assigned tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// CIDR blocks allowed to connect.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trusted_ips: Vec<String>,
    /// Read-only replicas attached to this cluster.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub read_replicas: Vec<Database>,
}

/// A database plan offered by the provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabasePlan {
    /// Plan identifier used in create requests.
    pub id: String,
    /// Number of nodes in the cluster.
    #[serde(default)]
    pub number_of_nodes: u32,
    /// vCPUs per node.
    #[serde(default)]
    pub vcpus: u32,
    /// RAM per node, in MB.
    #[serde(default)]
    pub ram: u32,
    /// Disk per node, in GB.
    #[serde(default)]
    pub disk: u32,
    /// Monthly cost in the account currency.
    #[serde(default)]
    pub monthly_cost: u32,
    /// Engines this plan supports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_engines: Vec<String>,
    /// Regions this plan is available in.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,
}

/// A user within a managed database cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseUser {
    /// Username within the cluster.
    pub username: String,
    /// Password issued for the user.
    #[serde(default)]
    pub password: String,
    /// Password encryption scheme, when the engine distinguishes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<String>,
}

/// Request body for creating a database subscription.
///
/// Every field is optional on the wire; unset fields are omitted entirely so
/// the provider applies its defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseCreateRequest {
    /// Display label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Region to create the cluster in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Plan identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Database engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// Engine major version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,
    /// Tag to assign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Day of week for the maintenance window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_dow: Option<String>,
    /// Start time for the maintenance window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_time: Option<String>,
    /// CIDR blocks allowed to connect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trusted_ips: Option<Vec<String>>,
    /// Enable the slow query log (engine permitting).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow_query_log: Option<bool>,
    /// Require a primary key on every table (engine permitting).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_primary_key: Option<bool>,
}

/// Request body for updating a database subscription.
///
/// Partial-update semantics: an omitted field leaves the current value
/// unchanged, while an explicit empty value clears it. `None` therefore
/// never reaches the wire, and `Some(String::new())` does.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseUpdateRequest {
    /// New display label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// New plan identifier (triggers a resize).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// New region (triggers a migration).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// New tag; an explicit empty string clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Day of week for the maintenance window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_dow: Option<String>,
    /// Start time for the maintenance window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_time: Option<String>,
    /// Cluster time zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_time_zone: Option<String>,
    /// CIDR blocks allowed to connect; an explicit empty list clears them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trusted_ips: Option<Vec<String>>,
    /// Enable or disable the slow query log.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow_query_log: Option<bool>,
    /// Require a primary key on every table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_primary_key: Option<bool>,
}

/// Request body for creating a database user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseUserCreateRequest {
    /// Username to create.
    pub username: String,
    /// Password; omitted to let the provider generate one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Password encryption scheme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption: Option<String>,
}

/// Request body for updating a database user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseUserUpdateRequest {
    /// New password; omitted to keep the current one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Request body for starting an engine version upgrade.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionUpgradeRequest {
    /// Target engine version; omitted to take the next available one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Deserialize)]
struct DatabasesEnvelope {
    databases: Vec<Database>,
    meta: Option<Meta>,
}

#[derive(Deserialize)]
struct DatabaseEnvelope {
    database: Database,
}

#[derive(Deserialize)]
struct PlansEnvelope {
    plans: Vec<DatabasePlan>,
    meta: Option<Meta>,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    users: Vec<DatabaseUser>,
    meta: Option<Meta>,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: DatabaseUser,
}

#[derive(Deserialize)]
struct MaintenanceUpdatesEnvelope {
    available_updates: Vec<String>,
}

#[derive(Deserialize)]
struct AvailableVersionsEnvelope {
    available_versions: Vec<String>,
}

/// Handler for the managed database endpoints.
///
/// Holds a shared reference to anything implementing [`Dispatch`] and does
/// no networking of its own.
#[derive(Clone, Copy, Debug)]
pub struct DatabaseHandler<'a, D> {
    dispatcher: &'a D,
}

impl<'a, D: Dispatch> DatabaseHandler<'a, D> {
    /// Creates a handler borrowing the given dispatcher.
    #[must_use]
    pub const fn new(dispatcher: &'a D) -> Self {
        Self { dispatcher }
    }

    /// Lists database subscriptions on the account, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn list(
        &self,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Database>, Option<Meta>), ClientError> {
        let mut builder = ApiRequest::builder(HttpMethod::Get, DATABASES_PATH);
        if let Some(options) = options {
            builder = builder.query_pairs(options.to_query_pairs());
        }

        let envelope: DatabasesEnvelope = self.dispatcher.dispatch(builder.build()?).await?;
        Ok((envelope.databases, envelope.meta))
    }

    /// Lists the database plans the provider offers.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn list_plans(
        &self,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<DatabasePlan>, Option<Meta>), ClientError> {
        let mut builder = ApiRequest::builder(HttpMethod::Get, format!("{DATABASES_PATH}/plans"));
        if let Some(options) = options {
            builder = builder.query_pairs(options.to_query_pairs());
        }

        let envelope: PlansEnvelope = self.dispatcher.dispatch(builder.build()?).await?;
        Ok((envelope.plans, envelope.meta))
    }

    /// Creates a database subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn create(&self, request: &DatabaseCreateRequest) -> Result<Database, ClientError> {
        let request = ApiRequest::builder(HttpMethod::Post, DATABASES_PATH)
            .json(request)?
            .build()?;

        let envelope: DatabaseEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.database)
    }

    /// Fetches a single database subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn get(&self, database_id: &str) -> Result<Database, ClientError> {
        let request =
            ApiRequest::builder(HttpMethod::Get, format!("{DATABASES_PATH}/{database_id}"))
                .build()?;

        let envelope: DatabaseEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.database)
    }

    /// Applies a partial update to a database subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn update(
        &self,
        database_id: &str,
        request: &DatabaseUpdateRequest,
    ) -> Result<Database, ClientError> {
        let request =
            ApiRequest::builder(HttpMethod::Put, format!("{DATABASES_PATH}/{database_id}"))
                .json(request)?
                .build()?;

        let envelope: DatabaseEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.database)
    }

    /// Deletes a database subscription. All data is permanently lost.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn delete(&self, database_id: &str) -> Result<(), ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Delete,
            format!("{DATABASES_PATH}/{database_id}"),
        )
        .build()?;

        self.dispatcher.dispatch_empty(request).await
    }

    /// Lists the users within a database cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn list_users(
        &self,
        database_id: &str,
    ) -> Result<(Vec<DatabaseUser>, Option<Meta>), ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Get,
            format!("{DATABASES_PATH}/{database_id}/users"),
        )
        .build()?;

        let envelope: UsersEnvelope = self.dispatcher.dispatch(request).await?;
        Ok((envelope.users, envelope.meta))
    }

    /// Creates a user within a database cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn create_user(
        &self,
        database_id: &str,
        request: &DatabaseUserCreateRequest,
    ) -> Result<DatabaseUser, ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Post,
            format!("{DATABASES_PATH}/{database_id}/users"),
        )
        .json(request)?
        .build()?;

        let envelope: UserEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.user)
    }

    /// Fetches a single user within a database cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn get_user(
        &self,
        database_id: &str,
        username: &str,
    ) -> Result<DatabaseUser, ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Get,
            format!("{DATABASES_PATH}/{database_id}/users/{username}"),
        )
        .build()?;

        let envelope: UserEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.user)
    }

    /// Updates a user within a database cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn update_user(
        &self,
        database_id: &str,
        username: &str,
        request: &DatabaseUserUpdateRequest,
    ) -> Result<DatabaseUser, ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Put,
            format!("{DATABASES_PATH}/{database_id}/users/{username}"),
        )
        .json(request)?
        .build()?;

        let envelope: UserEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.user)
    }

    /// Removes a user from a database cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn delete_user(&self, database_id: &str, username: &str) -> Result<(), ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Delete,
            format!("{DATABASES_PATH}/{database_id}/users/{username}"),
        )
        .build()?;

        self.dispatcher.dispatch_empty(request).await
    }

    /// Lists the maintenance updates available for a database cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn list_maintenance_updates(
        &self,
        database_id: &str,
    ) -> Result<Vec<String>, ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Get,
            format!("{DATABASES_PATH}/{database_id}/maintenance"),
        )
        .build()?;

        let envelope: MaintenanceUpdatesEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.available_updates)
    }

    /// Starts the maintenance update process for a database cluster.
    ///
    /// Returns the provider's acknowledgement message.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn start_maintenance(&self, database_id: &str) -> Result<String, ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Post,
            format!("{DATABASES_PATH}/{database_id}/maintenance"),
        )
        .build()?;

        let envelope: MessageEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.message)
    }

    /// Lists the engine versions a database cluster can upgrade to.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn list_available_versions(
        &self,
        database_id: &str,
    ) -> Result<Vec<String>, ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Get,
            format!("{DATABASES_PATH}/{database_id}/version-upgrade"),
        )
        .build()?;

        let envelope: AvailableVersionsEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.available_versions)
    }

    /// Starts an engine version upgrade for a database cluster.
    ///
    /// Returns the provider's acknowledgement message.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any dispatch failure.
    pub async fn start_version_upgrade(
        &self,
        database_id: &str,
        request: &VersionUpgradeRequest,
    ) -> Result<String, ClientError> {
        let request = ApiRequest::builder(
            HttpMethod::Post,
            format!("{DATABASES_PATH}/{database_id}/version-upgrade"),
        )
        .json(request)?
        .build()?;

        let envelope: MessageEnvelope = self.dispatcher.dispatch(request).await?;
        Ok(envelope.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_omits_unset_fields() {
        let request = DatabaseCreateRequest {
            label: Some("prod-db".to_string()),
            region: Some("ewr".to_string()),
            ..DatabaseCreateRequest::default()
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"label": "prod-db", "region": "ewr"}));
    }

    #[test]
    fn test_update_request_distinguishes_absent_from_explicit_empty() {
        // Omitted: the tag stays as it is on the server.
        let untouched = DatabaseUpdateRequest::default();
        assert_eq!(serde_json::to_value(&untouched).unwrap(), json!({}));

        // Explicit empty string: the tag is cleared.
        let cleared = DatabaseUpdateRequest {
            tag: Some(String::new()),
            ..DatabaseUpdateRequest::default()
        };
        assert_eq!(serde_json::to_value(&cleared).unwrap(), json!({"tag": ""}));
    }

    #[test]
    fn test_update_request_explicit_false_is_serialized() {
        let request = DatabaseUpdateRequest {
            slow_query_log: Some(false),
            ..DatabaseUpdateRequest::default()
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"slow_query_log": false}));
    }

    #[test]
    fn test_database_deserialization_from_api_response() {
        let json = r#"{
            "id": "9b0a8f",
            "label": "prod-db",
            "region": "ewr",
            "plan": "db-2c-4gb",
            "status": "running",
            "engine": "pg",
            "engine_version": "16",
            "host": "db-9b0a8f.nimbus.cloud",
            "port": "5432",
            "username": "nimbusadmin",
            "password": "s3cret",
            "created_at": "2026-05-01T10:00:00Z",
            "maintenance_dow": "sunday",
            "maintenance_time": "02:00",
            "trusted_ips": ["10.0.0.0/8"],
            "rollout_group": "early"
        }"#;

        let database: Database = serde_json::from_str(json).unwrap();

        assert_eq!(database.id, "9b0a8f");
        assert_eq!(database.engine, "pg");
        assert_eq!(database.maintenance_dow.as_deref(), Some("sunday"));
        assert_eq!(database.trusted_ips, vec!["10.0.0.0/8".to_string()]);
        // Unknown fields ("rollout_group") must be tolerated.
        assert!(database.read_replicas.is_empty());
    }

    #[test]
    fn test_collection_envelope_carries_meta() {
        let envelope: DatabasesEnvelope = serde_json::from_value(json!({
            "databases": [{"id": "a"}, {"id": "b"}],
            "meta": {"total": 2, "links": {"next": "", "prev": ""}}
        }))
        .unwrap();

        assert_eq!(envelope.databases.len(), 2);
        assert_eq!(envelope.meta.unwrap().total, 2);
    }

    #[test]
    fn test_collection_envelope_without_meta() {
        let envelope: DatabasesEnvelope = serde_json::from_value(json!({
            "databases": []
        }))
        .unwrap();

        assert!(envelope.databases.is_empty());
        assert!(envelope.meta.is_none());
    }

    #[test]
    fn test_user_create_request_serialization() {
        let request = DatabaseUserCreateRequest {
            username: "app".to_string(),
            password: None,
            encryption: None,
        };

        // Username always present; unset password omitted so the provider
        // generates one.
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"username": "app"})
        );
    }
}
