// ============================================
// Growable Buffer - CPU буфер с удвоением ёмкости
// ============================================
//
// Ёмкость всегда = initial * 2^k и никогда не уменьшается.
// При росте старое содержимое НЕ сохраняется: вызывающий код
// всегда перезаписывает буфер с нулевого смещения.
//
// Все "view" на данные - это заимствования, поэтому получить
// устаревший view после роста не даст borrow checker.

use bytemuck::Pod;

/// Буфер вершин/индексов/точек с логической длиной
pub struct GrowableBuffer<T: Pod> {
    /// Хранилище, data.len() == capacity
    data: Vec<T>,
    /// Логическая длина (len <= capacity)
    len: usize,
    /// Счётчик переаллокаций
    generation: u64,
}

impl<T: Pod> GrowableBuffer<T> {
    /// Создать буфер с начальной ёмкостью (минимум 1 элемент)
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            data: vec![T::zeroed(); initial_capacity.max(1)],
            len: 0,
            generation: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Сколько раз буфер переаллоцировался
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Удвоить ёмкость, пока не влезет `min_elements`.
    /// Возвращает true, если была переаллокация.
    pub fn ensure_capacity(&mut self, min_elements: usize) -> bool {
        if self.data.len() >= min_elements {
            return false;
        }

        let mut size = self.data.len();
        while size < min_elements {
            size = size.saturating_mul(2);
        }

        log::debug!(
            "GrowableBuffer<{}>: {} -> {} elements",
            std::any::type_name::<T>(),
            self.data.len(),
            size
        );

        // Старые данные не нужны - просто новая аллокация
        self.data = vec![T::zeroed(); size];
        self.len = 0;
        self.generation += 1;
        true
    }

    /// Записать последовательность с начала буфера
    pub fn write(&mut self, items: &[T]) {
        self.rewrite(items.len()).copy_from_slice(items);
    }

    /// Сбросить курсор в начало и выдать `len` элементов для записи.
    /// Логическая длина становится равной `len`.
    pub fn rewrite(&mut self, len: usize) -> &mut [T] {
        self.ensure_capacity(len);
        self.len = len;
        &mut self.data[..len]
    }

    /// Логическая длина = 0, ёмкость не меняется
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Записанные элементы
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.len]
    }

    /// Записанные элементы как байты (для upload)
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_doubles_until_fit() {
        let mut buf: GrowableBuffer<f32> = GrowableBuffer::new(3);
        assert_eq!(buf.capacity(), 3);

        assert!(buf.ensure_capacity(7));
        assert_eq!(buf.capacity(), 12);
        assert_eq!(buf.generation(), 1);

        // Уже влезает - без переаллокации
        assert!(!buf.ensure_capacity(12));
        assert_eq!(buf.generation(), 1);
    }

    #[test]
    fn test_capacity_never_shrinks() {
        let mut buf: GrowableBuffer<u16> = GrowableBuffer::new(4);
        let mut last = buf.capacity();
        for request in [1, 9, 2, 40, 0, 17, 100, 3] {
            buf.ensure_capacity(request);
            assert!(buf.capacity() >= last);
            assert!(buf.capacity() >= request);
            // Ёмкость остаётся initial * 2^k
            assert!((buf.capacity() / 4).is_power_of_two());
            last = buf.capacity();
        }
    }

    #[test]
    fn test_write_resets_cursor() {
        let mut buf: GrowableBuffer<u16> = GrowableBuffer::new(2);
        buf.write(&[1, 2, 3, 4, 5]);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 5]);
        assert_eq!(buf.capacity(), 8);

        buf.write(&[9]);
        assert_eq!(buf.as_slice(), &[9]);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut buf: GrowableBuffer<f32> = GrowableBuffer::new(1);
        buf.write(&[1.0; 10]);
        let cap = buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert!(buf.as_bytes().is_empty());
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn test_zero_initial_capacity_still_grows() {
        let mut buf: GrowableBuffer<f32> = GrowableBuffer::new(0);
        buf.write(&[1.0, 2.0, 3.0]);
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.as_bytes().len(), 12);
    }
}
