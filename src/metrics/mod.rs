pub mod base;
pub mod host;
pub mod monit;

use std::collections::HashMap;

use prometheus::core::Collector;
use prometheus::{Gauge, GaugeVec, Opts, Registry};

use crate::bosh::InstanceSpec;

pub use base::BaseMetrics;
pub use host::HostMetrics;
pub use monit::MonitMetrics;

pub const DEFAULT_NAMESPACE: &str = "boshi";

const ENVIRONMENT_LABEL: &str = "environment";
const DIRECTOR_NAME_LABEL: &str = "bosh_name";
const DIRECTOR_UUID_LABEL: &str = "bosh_uuid";
const DEPLOYMENT_LABEL: &str = "bosh_deployment";
const INSTANCE_NAME_LABEL: &str = "bosh_instance_name";
const INSTANCE_ID_LABEL: &str = "bosh_instance_id";
const INSTANCE_INDEX_LABEL: &str = "bosh_instance_index";
const INSTANCE_AZ_LABEL: &str = "bosh_instance_az";

/// Operator-supplied naming and identity for every exported series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricsContext {
    pub namespace: String,
    pub environment: String,
    pub bosh_name: String,
    pub bosh_uuid: String,
}

impl Default for MetricsContext {
    fn default() -> Self {
        MetricsContext {
            namespace: DEFAULT_NAMESPACE.to_string(),
            environment: String::new(),
            bosh_name: String::new(),
            bosh_uuid: String::new(),
        }
    }
}

/// Constant labels identifying the instance, attached to every series.
pub fn instance_labels(context: &MetricsContext, spec: &InstanceSpec) -> HashMap<String, String> {
    [
        (ENVIRONMENT_LABEL, context.environment.clone()),
        (DIRECTOR_NAME_LABEL, context.bosh_name.clone()),
        (DIRECTOR_UUID_LABEL, context.bosh_uuid.clone()),
        (DEPLOYMENT_LABEL, spec.deployment.clone()),
        (INSTANCE_NAME_LABEL, spec.name.clone()),
        (INSTANCE_ID_LABEL, spec.id.clone()),
        (INSTANCE_INDEX_LABEL, spec.index.to_string()),
        (INSTANCE_AZ_LABEL, spec.az.clone()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// A set of gauges registered and collected together.
pub trait MetricGroup {
    fn collectors(&self) -> Vec<Box<dyn Collector>>;

    fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        for collector in self.collectors() {
            registry.register(collector)?;
        }
        Ok(())
    }
}

/// Builds gauge options sharing a namespace, subsystem and constant labels.
#[derive(Clone, Debug)]
struct GaugeFactory {
    namespace: String,
    subsystem: String,
    const_labels: HashMap<String, String>,
}

impl GaugeFactory {
    fn new(namespace: &str, subsystem: &str, const_labels: HashMap<String, String>) -> Self {
        GaugeFactory {
            namespace: namespace.to_string(),
            subsystem: subsystem.to_string(),
            const_labels,
        }
    }

    fn opts(&self, name: &str, help: &str) -> Opts {
        Opts::new(name, help)
            .namespace(self.namespace.clone())
            .subsystem(self.subsystem.clone())
            .const_labels(self.const_labels.clone())
    }

    fn gauge(&self, name: &str, help: &str) -> prometheus::Result<Gauge> {
        Gauge::with_opts(self.opts(name, help))
    }

    fn gauge_vec(&self, name: &str, help: &str, labels: &[&str]) -> prometheus::Result<GaugeVec> {
        GaugeVec::new(self.opts(name, help), labels)
    }
}

fn boxed<C: Collector + Clone + 'static>(collector: &C) -> Box<dyn Collector> {
    Box::new(collector.clone())
}

/// Every gauge group the exporter publishes.
pub struct ExporterMetrics {
    pub base: BaseMetrics,
    pub monit: MonitMetrics,
    pub host: HostMetrics,
}

impl ExporterMetrics {
    pub fn new(
        program_name: &str,
        program_version: &str,
        context: &MetricsContext,
        spec: &InstanceSpec,
    ) -> prometheus::Result<Self> {
        let labels = instance_labels(context, spec);
        Ok(ExporterMetrics {
            base: BaseMetrics::new(&context.namespace, program_name, program_version, labels.clone())?,
            monit: MonitMetrics::new(&context.namespace, labels.clone())?,
            host: HostMetrics::new(&context.namespace, labels)?,
        })
    }

    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        self.base.register(registry)?;
        self.monit.register(registry)?;
        self.host.register(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> InstanceSpec {
        InstanceSpec {
            deployment: "test-dev".to_string(),
            name: "exporters".to_string(),
            index: 0,
            id: "b36ca4c9-80ce-426a-998e-8b23fd50efe3".to_string(),
            az: "z2".to_string(),
        }
    }

    fn context() -> MetricsContext {
        MetricsContext {
            namespace: "boshi".to_string(),
            environment: "test".to_string(),
            bosh_name: "test-director".to_string(),
            bosh_uuid: "123".to_string(),
        }
    }

    #[test]
    fn instance_labels_cover_spec_and_context() {
        let labels = instance_labels(&context(), &spec());
        assert_eq!(labels.len(), 8);
        assert_eq!(labels["environment"], "test");
        assert_eq!(labels["bosh_instance_index"], "0");
        assert_eq!(labels["bosh_instance_az"], "z2");
    }

    #[test]
    fn every_group_has_collectors() {
        let metrics = ExporterMetrics::new("test", "test", &context(), &spec()).unwrap();
        assert!(!metrics.base.collectors().is_empty());
        assert!(!metrics.monit.collectors().is_empty());
        assert!(!metrics.host.collectors().is_empty());
    }

    #[test]
    fn groups_register_without_conflicts() {
        let registry = Registry::new();
        let metrics = ExporterMetrics::new("test", "test", &context(), &spec()).unwrap();
        metrics.register(&registry).unwrap();
    }
}
