//! Diesel schema for agent registry persistence.

diesel::table! {
    /// Registered agents.
    agents (id) {
        /// Store-assigned agent identifier.
        id -> Int8,
        /// Agent name, unique together with `version`.
        name -> Varchar,
        /// Agent version, unique together with `name`.
        version -> Varchar,
        /// Optional human-readable name.
        display_name -> Nullable<Varchar>,
        /// Free-form description.
        description -> Text,
        /// Owning team or person.
        owner -> Varchar,
        /// Endpoint URL.
        endpoint -> Varchar,
        /// Opaque `OpenAPI` document.
        openapi_spec -> Jsonb,
        /// Deployment environment.
        environment -> Varchar,
        /// Ordered tags.
        tags -> Nullable<Array<Text>>,
        /// Out-of-band `OpenAPI` document location.
        openapi_spec_s3_uri -> Nullable<Varchar>,
        /// Out-of-band `OpenAPI` document checksum.
        openapi_spec_checksum -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Soft-delete flag.
        is_deleted -> Bool,
    }
}

diesel::table! {
    /// Named capabilities shared across agents.
    capabilities (id) {
        /// Store-assigned capability identifier.
        id -> Int8,
        /// Unique capability name.
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
    }
}

diesel::table! {
    /// Agent to capability association rows.
    ///
    /// The database declares no key on this table; Diesel requires one, so
    /// the pair is named here.
    agent_capabilities (agent_id, capability_id) {
        /// Linked agent.
        agent_id -> Int8,
        /// Linked capability.
        capability_id -> Int8,
    }
}

diesel::joinable!(agent_capabilities -> agents (agent_id));
diesel::joinable!(agent_capabilities -> capabilities (capability_id));

diesel::allow_tables_to_appear_in_same_query!(agents, capabilities, agent_capabilities);
