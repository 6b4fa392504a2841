//! Enumerations carried in API payloads.
//!
//! `AgentType` travels as a string, every other enum as an integer code.

use crate::{impl_code_conversions, impl_str_conversions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentType {
    AwsAccount,
    AwsTrustedAdvisor,
    AwsDynamoDb,
    AwsEc2,
    AwsElb,
    AwsRds,
    AwsS3,
    Agent,
    /// Remote connection check, the API calls these "monitors".
    Monitor,
    Snmp,
    Kubernetes,
    VSphereCluster,
    VSphereHost,
    VSphereVm,
}

impl_str_conversions!(AgentType {
    AwsAccount => "aws_account",
    AwsTrustedAdvisor => "aws_trusted_advisor",
    AwsDynamoDb => "aws_dynamodb",
    AwsEc2 => "aws_ec2",
    AwsElb => "aws_elb",
    AwsRds => "aws_rds",
    AwsS3 => "aws_s3",
    Agent => "agent",
    Monitor => "connection_check",
    Snmp => "snmp",
    Kubernetes => "kubernetes",
    VSphereCluster => "vsphere_cluster",
    VSphereHost => "vsphere_host",
    VSphereVm => "vsphere_vm",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisconnectionReason {
    CleanShutdown,
    AgentTimeout,
    AgentAutoUpgrade,
    AgentUpgrade,
}

impl_code_conversions!(DisconnectionReason {
    CleanShutdown => 1,
    AgentTimeout => 2,
    AgentAutoUpgrade => 3,
    AgentUpgrade => 4,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GloutonDiagnostic {
    Crash,
    OnDemand,
}

impl_code_conversions!(GloutonDiagnostic {
    Crash => 0,
    OnDemand => 1,
});

/// Dashboard widget rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Graph {
    Line,
    Stack,
    Pie,
    Gauge,
    AvailabilityTimeline,
    Number,
    Status,
    SnmpStatus,
    Text,
    Image,
    HeatmapStatus,
    Bar,
}

impl_code_conversions!(Graph {
    Line => 0,
    Stack => 1,
    Pie => 2,
    Gauge => 3,
    AvailabilityTimeline => 4,
    Number => 5,
    Status => 6,
    SnmpStatus => 7,
    Text => 8,
    Image => 9,
    HeatmapStatus => 10,
    Bar => 11,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportPeriod {
    Weekly,
    Monthly,
}

impl_code_conversions!(ReportPeriod {
    Weekly => 0,
    Monthly => 1,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportIncluded {
    None,
    Partial,
    Full,
}

impl_code_conversions!(ReportIncluded {
    None => 0,
    Partial => 1,
    Full => 2,
});

/// Health of a monitored item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl_code_conversions!(Status {
    Ok => 0,
    Warning => 1,
    Critical => 2,
    Unknown => 3,
});

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn agent_type_uses_wire_names() {
        assert_eq!(AgentType::Monitor.to_string(), "connection_check");
        assert_eq!("kubernetes".parse::<AgentType>().unwrap(), AgentType::Kubernetes);
        assert_eq!(json!(AgentType::AwsDynamoDb), json!("aws_dynamodb"));
    }

    #[test]
    fn integer_enums_serialize_as_codes() {
        assert_eq!(json!(Graph::Bar), json!(11));
        assert_eq!(json!(DisconnectionReason::CleanShutdown), json!(1));
        assert_eq!(json!(Status::Unknown), json!(3));
    }

    #[test]
    fn integer_enums_reject_unknown_codes() {
        assert!(DisconnectionReason::try_from(0).is_err());
        assert!(Graph::try_from(12).is_err());
        assert_eq!(ReportIncluded::try_from(2).unwrap(), ReportIncluded::Full);
    }

    #[test]
    fn widget_payload_deserializes_graph() {
        #[derive(serde::Deserialize)]
        struct Widget {
            graph: Graph,
        }

        let widget: Widget = serde_json::from_value(json!({"graph": 3})).unwrap();
        assert_eq!(widget.graph, Graph::Gauge);
    }
}
