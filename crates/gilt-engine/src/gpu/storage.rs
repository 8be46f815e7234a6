use crate::graphics::Vertex;
use crate::render::{allocate_id, VertexBufferUsage, VertexStorage};

const VERTEX_SIZE: u64 = std::mem::size_of::<Vertex>() as u64;

/// A wgpu vertex buffer backing a [`VertexBuffer`](crate::render::VertexBuffer).
#[derive(Debug)]
pub struct WgpuStorage {
    id: u64,
    capacity: usize,
    device: wgpu::Device,
    queue: wgpu::Queue,
    buffer: wgpu::Buffer,
}

impl WgpuStorage {
    pub(crate) fn new(device: &wgpu::Device, queue: &wgpu::Queue, capacity: usize, usage: VertexBufferUsage) -> Self {
        Self {
            id: allocate_id(),
            capacity,
            device: device.clone(),
            queue: queue.clone(),
            buffer: create_buffer(device, capacity, usage),
        }
    }

    #[inline]
    pub(crate) fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

impl VertexStorage for WgpuStorage {
    fn id(&self) -> u64 {
        self.id
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn reallocate(&mut self, capacity: usize, usage: VertexBufferUsage) {
        self.buffer = create_buffer(&self.device, capacity, usage);
        self.capacity = capacity;
    }

    fn write(&mut self, offset: usize, vertices: &[Vertex]) {
        self.queue.write_buffer(&self.buffer, offset as u64 * VERTEX_SIZE, bytemuck::cast_slice(vertices));
    }

    fn copy_from(&mut self, source: &Self, count: usize) {
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("gilt vertex copy"),
        });
        encoder.copy_buffer_to_buffer(&source.buffer, 0, &self.buffer, 0, count as u64 * VERTEX_SIZE);
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

fn create_buffer(device: &wgpu::Device, capacity: usize, usage: VertexBufferUsage) -> wgpu::Buffer {
    let label = match usage {
        VertexBufferUsage::Stream => "gilt stream vertices",
        VertexBufferUsage::Dynamic => "gilt dynamic vertices",
        VertexBufferUsage::Static => "gilt static vertices",
    };
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: capacity.max(1) as u64 * VERTEX_SIZE,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    })
}
