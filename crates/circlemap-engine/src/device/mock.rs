//! Recording device context for tests.

use std::cell::RefCell;
use std::rc::Rc;

use super::{BufferHandle, DeviceContext};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BufferRecord {
    pub label: String,
    pub bytes: Vec<u8>,
    pub stride: u64,
    pub destroyed: bool,
}

pub(crate) type DeviceLog = Rc<RefCell<Vec<BufferRecord>>>;

#[derive(Debug)]
pub(crate) struct MockBuffer {
    id: usize,
    size: u64,
    log: DeviceLog,
}

impl MockBuffer {
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }
}

impl BufferHandle for MockBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn destroy(self) {
        let mut log = self.log.borrow_mut();
        let record = &mut log[self.id];
        assert!(!record.destroyed, "buffer `{}` destroyed twice", record.label);
        record.destroyed = true;
    }
}

/// Records every buffer it creates, and whether each was destroyed.
#[derive(Debug, Default)]
pub(crate) struct MockDevice {
    pub log: DeviceLog,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn live(&self) -> usize {
        self.log.borrow().iter().filter(|r| !r.destroyed).count()
    }

    pub fn record(&self, id: usize) -> BufferRecord {
        self.log.borrow()[id].clone()
    }

    fn push(&mut self, label: &str, bytes: &[u8], stride: u64) -> MockBuffer {
        let mut log = self.log.borrow_mut();
        log.push(BufferRecord {
            label: label.to_owned(),
            bytes: bytes.to_vec(),
            stride,
            destroyed: false,
        });
        MockBuffer { id: log.len() - 1, size: bytes.len() as u64, log: Rc::clone(&self.log) }
    }
}

impl DeviceContext for MockDevice {
    type Buffer = MockBuffer;

    fn create_vertex_buffer(
        &mut self,
        label: &str,
        contents: &[u8],
        layout: &wgpu::VertexBufferLayout<'_>,
    ) -> MockBuffer {
        self.push(label, contents, layout.array_stride)
    }

    fn create_index_buffer(&mut self, label: &str, indices: &[u16]) -> MockBuffer {
        self.push(label, bytemuck::cast_slice(indices), 0)
    }
}
