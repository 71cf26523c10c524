// ============================================
// GPU Stream Buffer - wgpu буфер с удвоением размера
// ============================================
//
// Зеркало GrowableBuffer на стороне GPU. Пересоздаётся только
// когда данные не влезают, размер удваивается. Запись всегда
// с нулевого смещения через queue.write_buffer.

use bytemuck::Pod;

use super::growable::GrowableBuffer;

/// Выравнивание вверх до COPY_BUFFER_ALIGNMENT
#[inline]
fn align_copy(size: u64) -> u64 {
    let align = wgpu::COPY_BUFFER_ALIGNMENT;
    (size + align - 1) / align * align
}

/// Новый размер при нехватке места: удвоение текущего, пока не влезет `required`
#[inline]
fn grown_size(current: u64, required: u64) -> u64 {
    let mut size = align_copy(current.max(wgpu::COPY_BUFFER_ALIGNMENT));
    while size < required {
        size = size.saturating_mul(2);
    }
    size
}

/// Потоковый GPU буфер (вершины, индексы или точки)
pub struct GpuStreamBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buffer: wgpu::Buffer,
    /// Количество элементов последнего upload
    element_count: u32,
    /// Хвост для выравнивания (u16 индексы с нечётным количеством)
    padded: Vec<u8>,
}

impl GpuStreamBuffer {
    /// `usage` дополняется COPY_DST автоматически
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        usage: wgpu::BufferUsages,
        initial_size_bytes: u64,
    ) -> Self {
        let usage = usage | wgpu::BufferUsages::COPY_DST;
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: align_copy(initial_size_bytes.max(wgpu::COPY_BUFFER_ALIGNMENT)),
            usage,
            mapped_at_creation: false,
        });

        Self {
            label,
            usage,
            buffer,
            element_count: 0,
            padded: Vec::new(),
        }
    }

    /// Загрузить содержимое CPU буфера. Возвращает true при пересоздании.
    pub fn upload<T: Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        src: &GrowableBuffer<T>,
    ) -> bool {
        let bytes = src.as_bytes();
        let required = align_copy(bytes.len() as u64);

        let recreated = if self.buffer.size() < required {
            let size = grown_size(self.buffer.size(), required);
            log::debug!("{}: GPU buffer {} -> {} bytes", self.label, self.buffer.size(), size);

            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size,
                usage: self.usage,
                mapped_at_creation: false,
            });
            true
        } else {
            false
        };

        if !bytes.is_empty() {
            if bytes.len() as u64 == required {
                queue.write_buffer(&self.buffer, 0, bytes);
            } else {
                self.padded.clear();
                self.padded.extend_from_slice(bytes);
                self.padded.resize(required as usize, 0);
                queue.write_buffer(&self.buffer, 0, &self.padded);
            }
        }

        self.element_count = src.len() as u32;
        recreated
    }

    #[inline]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Сколько элементов можно рисовать
    #[inline]
    pub fn len(&self) -> u32 {
        self.element_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.element_count == 0
    }

    #[inline]
    pub fn size_bytes(&self) -> u64 {
        self.buffer.size()
    }
}
