//! Collections exposed by the Bleemeo API.

use crate::impl_str_conversions;

/// A top-level API collection.
///
/// `Display` gives the bare collection name (`metric`); [`Resource::path`]
/// gives the relative request path (`v1/metric/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Account,
    AccountConfig,
    AgentConfig,
    AuditLog,
    Agent,
    AgentFact,
    AgentType,
    AwsIntegration,
    ContactsGroup,
    Container,
    Dashboard,
    Event,
    GloutonConfigItem,
    GloutonCrashReport,
    GloutonDiagnostic,
    HealthCheck,
    Integration,
    IntegrationTemplate,
    Limit,
    Metric,
    MetricName,
    MetricOperation,
    MetricTemplateGroup,
    NotificationExecution,
    NotificationRule,
    RecordingRule,
    Report,
    Silence,
    SilenceRecurrent,
    Slo,
    ServerGroup,
    Service,
    Session,
    Tag,
    User,
    Widget,
}

impl_str_conversions!(Resource {
    Account => "account",
    AccountConfig => "accountconfig",
    AgentConfig => "agentconfig",
    AuditLog => "auditlog",
    Agent => "agent",
    AgentFact => "agentfact",
    AgentType => "agenttype",
    AwsIntegration => "awsintegration",
    ContactsGroup => "contactsgroup",
    Container => "container",
    Dashboard => "dashboard",
    Event => "event",
    GloutonConfigItem => "gloutonconfigitem",
    GloutonCrashReport => "gloutoncrashreport",
    GloutonDiagnostic => "gloutondiagnostic",
    HealthCheck => "healthcheck",
    Integration => "integration",
    IntegrationTemplate => "integrationtemplate",
    Limit => "limit",
    Metric => "metric",
    MetricName => "metricname",
    MetricOperation => "metricoperation",
    MetricTemplateGroup => "metrictemplategroup",
    NotificationExecution => "notificationexecution",
    NotificationRule => "notificationrule",
    RecordingRule => "recordingrule",
    Report => "report",
    Silence => "silence",
    SilenceRecurrent => "silencerecurrent",
    Slo => "slo",
    ServerGroup => "servergroup",
    Service => "service",
    Session => "session",
    Tag => "tag",
    User => "user",
    Widget => "widget",
});

impl Resource {
    /// Every known collection, in declaration order.
    pub const ALL: [Resource; 36] = [
        Resource::Account,
        Resource::AccountConfig,
        Resource::AgentConfig,
        Resource::AuditLog,
        Resource::Agent,
        Resource::AgentFact,
        Resource::AgentType,
        Resource::AwsIntegration,
        Resource::ContactsGroup,
        Resource::Container,
        Resource::Dashboard,
        Resource::Event,
        Resource::GloutonConfigItem,
        Resource::GloutonCrashReport,
        Resource::GloutonDiagnostic,
        Resource::HealthCheck,
        Resource::Integration,
        Resource::IntegrationTemplate,
        Resource::Limit,
        Resource::Metric,
        Resource::MetricName,
        Resource::MetricOperation,
        Resource::MetricTemplateGroup,
        Resource::NotificationExecution,
        Resource::NotificationRule,
        Resource::RecordingRule,
        Resource::Report,
        Resource::Silence,
        Resource::SilenceRecurrent,
        Resource::Slo,
        Resource::ServerGroup,
        Resource::Service,
        Resource::Session,
        Resource::Tag,
        Resource::User,
        Resource::Widget,
    ];

    /// Relative collection path, always with a trailing slash.
    #[must_use]
    pub fn path(&self) -> String {
        format!("v1/{}/", self.as_str())
    }

    /// Relative path of a single item in this collection.
    #[must_use]
    pub fn item_path(&self, id: &str) -> String {
        format!("v1/{}/{}/", self.as_str(), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_versioned_layout() {
        assert_eq!(Resource::Metric.path(), "v1/metric/");
        assert_eq!(Resource::AwsIntegration.path(), "v1/awsintegration/");
        assert_eq!(Resource::Widget.item_path("abc"), "v1/widget/abc/");
    }

    #[test]
    fn all_names_parse_back() {
        for resource in Resource::ALL {
            let parsed: Resource = resource.to_string().parse().unwrap();
            assert_eq!(parsed, resource);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!("v1/metric".parse::<Resource>().is_err());
        assert!("nothing".parse::<Resource>().is_err());
    }
}
