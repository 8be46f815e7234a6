use anyhow::{Context, Result};

use super::GpuInit;

/// Instance, adapter, device and queue shared by every target and resource.
///
/// All members are reference-counted handles, so cloning is cheap.
#[derive(Debug, Clone)]
pub struct GpuContext {
    pub(crate) instance: wgpu::Instance,
    pub(crate) adapter: wgpu::Adapter,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
}

impl GpuContext {
    /// Creates a context without a surface, blocking on adapter/device acquisition.
    ///
    /// Suitable for offscreen rendering and tooling.
    pub fn headless(init: &GpuInit) -> Result<Self> {
        let instance = new_instance();
        pollster::block_on(Self::request(instance, None, init))
    }

    /// Acquires an adapter (compatible with `surface`, when given) and a device.
    pub(crate) async fn request(
        instance: wgpu::Instance,
        surface: Option<&wgpu::Surface<'_>>,
        init: &GpuInit,
    ) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: surface,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("gilt device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        log::debug!("gpu context on {:?}", adapter.get_info().name);

        Ok(Self { instance, adapter, device, queue })
    }

    #[inline]
    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    #[inline]
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }
}

/// Uses all backends so wgpu can select the platform's best one.
pub(crate) fn new_instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}
