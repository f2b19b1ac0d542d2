//! In-memory [`VramBackend`] for unit tests.

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::backend::DeviceProperty;
use crate::backend::MemoryKind;
use crate::backend::VramBackend;
use crate::status::RsmiStatus;
use crate::version::VersionInfo;

pub(crate) struct MockBackend {
    devices: Vec<(u64, u64)>,
    count_failure: Option<RsmiStatus>,
    total_failure: Option<(u32, RsmiStatus)>,
    used_failure: Option<(u32, RsmiStatus)>,
    failing_properties: HashSet<DeviceProperty>,
    fail_device_id: bool,
    version: Result<VersionInfo, RsmiStatus>,
    calls: Cell<usize>,
    describe_calls: Cell<usize>,
    memory_queried: RefCell<HashSet<u32>>,
    shutdowns: Rc<Cell<u32>>,
}

impl MockBackend {
    /// One device per `(total, used)` pair.
    pub(crate) fn with_devices(devices: &[(u64, u64)]) -> Self {
        Self {
            devices: devices.to_vec(),
            count_failure: None,
            total_failure: None,
            used_failure: None,
            failing_properties: HashSet::new(),
            fail_device_id: false,
            version: Ok(VersionInfo {
                major: 7,
                minor: 3,
                patch: 0,
                build: "7.3.0".to_string(),
            }),
            calls: Cell::new(0),
            describe_calls: Cell::new(0),
            memory_queried: RefCell::new(HashSet::new()),
            shutdowns: Rc::new(Cell::new(0)),
        }
    }

    pub(crate) fn fail_device_count(mut self, status: RsmiStatus) -> Self {
        self.count_failure = Some(status);
        self
    }

    pub(crate) fn fail_total_memory(mut self, index: u32, status: RsmiStatus) -> Self {
        self.total_failure = Some((index, status));
        self
    }

    pub(crate) fn fail_used_memory(mut self, index: u32, status: RsmiStatus) -> Self {
        self.used_failure = Some((index, status));
        self
    }

    pub(crate) fn fail_descriptions(mut self, properties: &[DeviceProperty]) -> Self {
        self.failing_properties.extend(properties.iter().copied());
        self
    }

    pub(crate) fn fail_device_id(mut self) -> Self {
        self.fail_device_id = true;
        self
    }

    pub(crate) fn fail_version(mut self, status: RsmiStatus) -> Self {
        self.version = Err(status);
        self
    }

    /// Number of vendor calls made so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }

    pub(crate) fn describe_calls(&self) -> usize {
        self.describe_calls.get()
    }

    pub(crate) fn memory_queried(&self, index: u32) -> bool {
        self.memory_queried.borrow().contains(&index)
    }

    /// Shutdown counter that outlives the backend.
    pub(crate) fn shutdown_counter(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.shutdowns)
    }

    fn record_call(&self) {
        self.calls.set(self.calls.get() + 1);
    }

    fn device(&self, index: u32) -> Result<(u64, u64), RsmiStatus> {
        self.devices
            .get(index as usize)
            .copied()
            .ok_or(RsmiStatus::INVALID_ARGS)
    }
}

impl VramBackend for MockBackend {
    fn device_count(&self) -> Result<u32, RsmiStatus> {
        self.record_call();
        match self.count_failure {
            Some(status) => Err(status),
            None => Ok(self.devices.len() as u32),
        }
    }

    fn device_id(&self, index: u32) -> Result<u16, RsmiStatus> {
        self.record_call();
        if self.fail_device_id {
            return Err(RsmiStatus::NOT_SUPPORTED);
        }
        self.device(index).map(|_| 0x7400 + index as u16)
    }

    fn describe(&self, index: u32, property: DeviceProperty) -> Result<String, RsmiStatus> {
        self.record_call();
        self.describe_calls.set(self.describe_calls.get() + 1);
        if self.failing_properties.contains(&property) {
            return Err(RsmiStatus::NOT_SUPPORTED);
        }
        self.device(index).map(|_| format!("mock {property} {index}"))
    }

    fn total_memory(&self, index: u32, _kind: MemoryKind) -> Result<u64, RsmiStatus> {
        self.record_call();
        self.memory_queried.borrow_mut().insert(index);
        match self.total_failure {
            Some((failing, status)) if failing == index => Err(status),
            _ => self.device(index).map(|(total, _)| total),
        }
    }

    fn used_memory(&self, index: u32, _kind: MemoryKind) -> Result<u64, RsmiStatus> {
        self.record_call();
        self.memory_queried.borrow_mut().insert(index);
        match self.used_failure {
            Some((failing, status)) if failing == index => Err(status),
            _ => self.device(index).map(|(_, used)| used),
        }
    }

    fn version(&self) -> Result<VersionInfo, RsmiStatus> {
        self.record_call();
        self.version.clone()
    }

    fn shutdown(&mut self) {
        self.shutdowns.set(self.shutdowns.get() + 1);
    }
}
