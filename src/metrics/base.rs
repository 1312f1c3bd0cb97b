use std::collections::HashMap;

use prometheus::Gauge;
use prometheus::core::Collector;

use super::{GaugeFactory, MetricGroup, boxed};

const PROGRAM_NAME_LABEL: &str = "program_name";
const PROGRAM_VERSION_LABEL: &str = "program_version";

pub struct BaseMetrics {
    pub build_info: Gauge,
    pub instance_info: Gauge,
}

impl BaseMetrics {
    pub fn new(
        namespace: &str,
        program_name: &str,
        program_version: &str,
        instance_labels: HashMap<String, String>,
    ) -> prometheus::Result<Self> {
        let build_labels = HashMap::from([
            (PROGRAM_NAME_LABEL.to_string(), program_name.to_string()),
            (PROGRAM_VERSION_LABEL.to_string(), program_version.to_string()),
        ]);
        let build = GaugeFactory::new(namespace, "", build_labels);
        let instance = GaugeFactory::new(namespace, "", instance_labels);
        Ok(BaseMetrics {
            build_info: build.gauge("build_info", "Program build information")?,
            instance_info: instance.gauge("instance_info", "Bosh instance information")?,
        })
    }

    pub fn emit(&self) {
        self.build_info.set(1.0);
        self.instance_info.set(1.0);
    }
}

impl MetricGroup for BaseMetrics {
    fn collectors(&self) -> Vec<Box<dyn Collector>> {
        vec![boxed(&self.build_info), boxed(&self.instance_info)]
    }
}
