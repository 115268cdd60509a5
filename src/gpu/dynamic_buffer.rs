//! Dynamic GPU buffer management with automatic resizing
//!
//! Provides buffers that grow automatically when data exceeds capacity,
//! using a 2x growth strategy to minimize reallocations.

use std::marker::PhantomData;

/// Smallest allocation handed to wgpu.
const MIN_CAPACITY: usize = 64;

/// Capacity after a write of `needed` bytes into a buffer of `capacity`.
///
/// Unchanged when the data fits; otherwise 2x the request, and always at
/// least 1 KiB more than before. Growth stops at `max` unless the request
/// itself is larger.
#[must_use]
pub fn grown_capacity(needed: usize, capacity: usize, max: usize) -> usize {
    if needed <= capacity {
        capacity
    } else {
        needed
            .saturating_mul(2)
            .max(capacity + 1024)
            .min(max.max(needed))
    }
}

/// Largest buffer size `device` can bind with `usage`.
fn binding_limit(device: &wgpu::Device, usage: wgpu::BufferUsages) -> usize {
    let limits = device.limits();
    let mut max = limits.max_buffer_size;
    if usage.contains(wgpu::BufferUsages::STORAGE) {
        max = max.min(u64::from(limits.max_storage_buffer_binding_size));
    }
    usize::try_from(max).unwrap_or(usize::MAX)
}

/// A GPU buffer that can grow dynamically
///
/// Uses a 2x growth strategy when capacity is exceeded, capped at the
/// device's binding limit for the buffer's usage.
/// Never shrinks (GPU buffers cannot be resized in place).
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,     // Capacity in bytes
    max_capacity: usize, // Binding limit in bytes
    usage: wgpu::BufferUsages,
    label: String,
}

impl DynamicBuffer {
    /// Buffer with the given initial byte capacity.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let max_capacity = binding_limit(device, usage);
        let capacity = initial_capacity.max(MIN_CAPACITY).min(max_capacity);
        Self {
            buffer: Self::allocate(device, label, capacity, usage),
            capacity,
            max_capacity,
            usage,
            label: label.to_owned(),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Write data to buffer, growing if necessary
    ///
    /// Returns `true` if buffer was reallocated (bind groups need recreation)
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let data_bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = data_bytes.len();

        let new_capacity =
            grown_capacity(needed, self.capacity, self.max_capacity);
        let reallocated = new_capacity != self.capacity;
        if reallocated {
            log::debug!(
                "{}: growing {} -> {} bytes",
                self.label,
                self.capacity,
                new_capacity
            );
            self.buffer =
                Self::allocate(device, &self.label, new_capacity, self.usage);
            self.capacity = new_capacity;
        }

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, data_bytes);
        }

        reallocated
    }

    /// The underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

/// Typed wrapper for DynamicBuffer with cleaner API
///
/// Tracks item count rather than byte length.
pub struct TypedBuffer<T> {
    inner: DynamicBuffer,
    count: usize,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Specified initial capacity (in items).
    #[must_use]
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let initial_capacity = size_of::<T>() * capacity;
        Self {
            inner: DynamicBuffer::new(device, label, initial_capacity, usage),
            count: 0,
            _marker: PhantomData,
        }
    }

    /// Write data to buffer, growing if necessary
    ///
    /// Returns `true` if buffer was reallocated (bind groups need recreation)
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        self.count = data.len();
        self.inner.write(device, queue, data)
    }

    /// The underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        self.inner.buffer()
    }

    /// Items written by the last write.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the last write was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_LIMIT: usize = usize::MAX;
    // wgpu's default `max_storage_buffer_binding_size`.
    const STORAGE_LIMIT: usize = 128 << 20;

    #[test]
    fn fits_without_growth() {
        assert_eq!(grown_capacity(0, 64, NO_LIMIT), 64);
        assert_eq!(grown_capacity(64, 64, NO_LIMIT), 64);
    }

    #[test]
    fn grows_to_double_the_request() {
        assert_eq!(grown_capacity(64 * 15_000, 64, NO_LIMIT), 64 * 30_000);
    }

    #[test]
    fn small_overflow_grows_by_at_least_one_kib() {
        assert_eq!(grown_capacity(65, 64, NO_LIMIT), 64 + 1024);
    }

    #[test]
    fn growth_stops_at_the_binding_limit() {
        // 1.5M forest instances at 112 bytes fit, but twice that would not.
        let needed = 112 * 1_500_000;
        assert!(needed < STORAGE_LIMIT);
        assert_eq!(grown_capacity(needed, 64, STORAGE_LIMIT), STORAGE_LIMIT);
        assert_eq!(
            grown_capacity(STORAGE_LIMIT, 64, STORAGE_LIMIT),
            STORAGE_LIMIT
        );
    }
}
