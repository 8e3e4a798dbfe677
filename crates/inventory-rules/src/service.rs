//! Device service — create, query, update and delete with state guards.
//!
//! Every operation is a self-contained read-modify-write against the store.
//! There is no locking between the read and the write of `update` and
//! `delete_by_id`; concurrent updates of the same device race and the last
//! writer wins.

use std::sync::Arc;

use tracing::{debug, info, warn};

use inventory_state::{Device, DeviceId, DeviceState, DeviceStore, NewDevice};

use crate::error::{RulesError, RulesResult};

const IN_USE_FIELDS_FROZEN: &str = "cannot change name or brand of an in-use device";
const IN_USE_NOT_DELETABLE: &str = "device is in use, cannot be deleted";

/// Requested field values for [`DeviceService::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceUpdate {
    pub name: String,
    pub brand: String,
    pub state: DeviceState,
}

impl DeviceUpdate {
    pub fn new(name: impl Into<String>, brand: impl Into<String>, state: DeviceState) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            state,
        }
    }
}

/// Rules engine over a shared device store.
#[derive(Clone)]
pub struct DeviceService {
    store: Arc<dyn DeviceStore>,
}

impl DeviceService {
    pub fn new(store: Arc<dyn DeviceStore>) -> Self {
        Self { store }
    }

    /// Persist a new device. The store assigns the id and creation time.
    pub fn create(&self, device: NewDevice) -> RulesResult<Device> {
        let device = self.store.insert(device)?;
        info!(id = device.id, brand = %device.brand, state = %device.state, "device created");
        Ok(device)
    }

    /// Apply `update` to the device with the given id.
    ///
    /// The guard is evaluated against the device's *current* state: an
    /// `IN_USE` device keeps its name and brand even when the same call
    /// moves it out of `IN_USE`. The state itself is always replaced.
    pub fn update(&self, id: DeviceId, update: DeviceUpdate) -> RulesResult<Device> {
        let mut device = self.require(id)?;

        match device.state {
            DeviceState::InUse => {
                if device.name != update.name || device.brand != update.brand {
                    warn!(id, "rejected name/brand change on in-use device");
                    return Err(RulesError::InvalidOperation(IN_USE_FIELDS_FROZEN.to_string()));
                }
            }
            DeviceState::Available | DeviceState::Inactive => {
                device.name = update.name;
                device.brand = update.brand;
            }
        }
        let previous = device.state;
        device.state = update.state;

        let device = self.store.save(&device)?;
        info!(id, from = %previous, to = %device.state, "device updated");
        Ok(device)
    }

    /// Fetch a single device.
    pub fn get_by_id(&self, id: DeviceId) -> RulesResult<Device> {
        debug!(id, "getting device");
        self.require(id)
    }

    /// Every device in the store.
    pub fn list_all(&self) -> RulesResult<Vec<Device>> {
        let devices = self.store.find_all()?;
        debug!(count = devices.len(), "listed devices");
        Ok(devices)
    }

    /// Devices with exactly this brand. No match is an empty list.
    pub fn list_by_brand(&self, brand: &str) -> RulesResult<Vec<Device>> {
        let devices = self.store.find_by_brand(brand)?;
        debug!(brand, count = devices.len(), "listed devices by brand");
        Ok(devices)
    }

    /// Devices currently in `state`. No match is an empty list.
    pub fn list_by_state(&self, state: DeviceState) -> RulesResult<Vec<Device>> {
        let devices = self.store.find_by_state(state)?;
        debug!(%state, count = devices.len(), "listed devices by state");
        Ok(devices)
    }

    /// Permanently remove a device that is not in use.
    pub fn delete_by_id(&self, id: DeviceId) -> RulesResult<()> {
        let device = self.require(id)?;

        match device.state {
            DeviceState::InUse => {
                warn!(id, "rejected delete of in-use device");
                Err(RulesError::InvalidOperation(IN_USE_NOT_DELETABLE.to_string()))
            }
            DeviceState::Available | DeviceState::Inactive => {
                // A concurrent delete may have removed it since the lookup.
                if !self.store.delete_by_id(id)? {
                    return Err(RulesError::NotFound(id));
                }
                info!(id, "device deleted");
                Ok(())
            }
        }
    }

    fn require(&self, id: DeviceId) -> RulesResult<Device> {
        self.store.find_by_id(id)?.ok_or(RulesError::NotFound(id))
    }
}
