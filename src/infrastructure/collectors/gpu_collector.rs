#[cfg(feature = "nvml")]
use nvml_wrapper::enum_wrappers::device::TemperatureSensor;
#[cfg(feature = "nvml")]
use nvml_wrapper::Nvml;
use tracing::debug;

use crate::domain::entities::GpuInfo;
use crate::domain::ports::metric_source::CollectionError;

/// Enumerates NVIDIA GPUs through NVML.
///
/// On a host without the NVIDIA driver the collector reports no GPUs.
/// Without the `nvml` feature GPU queries are unsupported.
pub struct GpuCollector {
    #[cfg(feature = "nvml")]
    nvml: Option<Nvml>,
}

impl GpuCollector {
    #[cfg(feature = "nvml")]
    #[must_use]
    pub fn new() -> Self {
        let nvml = match Nvml::init() {
            Ok(nvml) => Some(nvml),
            Err(e) => {
                debug!("NVML not available: {e}");
                None
            }
        };
        Self { nvml }
    }

    #[cfg(not(feature = "nvml"))]
    #[must_use]
    pub fn new() -> Self {
        debug!("built without NVML support, GPU queries are unsupported");
        Self {}
    }

    /// # Errors
    ///
    /// Returns `CollectionError::MetricsUnavailable` if the driver is loaded
    /// but a device cannot be queried.
    #[cfg(feature = "nvml")]
    pub fn collect(&self) -> Result<Vec<GpuInfo>, CollectionError> {
        let Some(nvml) = self.nvml.as_ref() else {
            return Ok(Vec::new());
        };

        let count = nvml
            .device_count()
            .map_err(|e| CollectionError::MetricsUnavailable(format!("NVML device count: {e}")))?;

        (0..count)
            .map(|index| {
                let device = nvml.device_by_index(index).map_err(|e| {
                    CollectionError::MetricsUnavailable(format!("NVML device {index}: {e}"))
                })?;
                let memory = device.memory_info().map_err(|e| {
                    CollectionError::MetricsUnavailable(format!("NVML memory of device {index}: {e}"))
                })?;

                Ok(GpuInfo {
                    name: device.name().unwrap_or_else(|_| format!("GPU {index}")),
                    uuid: device.uuid().unwrap_or_default(),
                    load_percent: device
                        .utilization_rates()
                        .map_or(0.0, |u| f64::from(u.gpu)),
                    memory_total_bytes: memory.total,
                    memory_used_bytes: memory.used,
                    memory_free_bytes: memory.free,
                    temperature_celsius: device
                        .temperature(TemperatureSensor::Gpu)
                        .ok()
                        .map(f64::from),
                })
            })
            .collect()
    }

    /// # Errors
    ///
    /// Always returns `CollectionError::Unsupported`; no GPU backend is
    /// compiled in.
    #[cfg(not(feature = "nvml"))]
    pub fn collect(&self) -> Result<Vec<GpuInfo>, CollectionError> {
        Err(CollectionError::Unsupported("gpu query".to_string()))
    }
}

impl Default for GpuCollector {
    fn default() -> Self {
        Self::new()
    }
}
