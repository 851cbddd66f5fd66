use super::api::*;
use log::*;

/// Drains the compositor event queue and keeps a lazily resolved device class per tracked
/// device index.
pub struct EventMonitor {
    device_classes: [Option<TrackedDeviceClass>; MAX_TRACKED_DEVICE_COUNT],
    status: String,
    dirty: bool,
}

impl Default for EventMonitor {
    fn default() -> Self {
        Self {
            device_classes: [None; MAX_TRACKED_DEVICE_COUNT],
            status: String::new(),
            dirty: false,
        }
    }
}

impl EventMonitor {
    /// Returns the number of device change events handled.
    pub fn poll<A: OpenvrApi>(&mut self, api: &A) -> usize {
        let mut device_events = 0;

        while let Some(event) = api.poll_next_event() {
            let status = match event.event_type {
                VrEventType::TrackedDeviceActivated => "A device was activated.",
                VrEventType::TrackedDeviceDeactivated => "A device was deactivated.",
                VrEventType::TrackedDeviceUpdated => "A device was updated.",
                VrEventType::Other(_) => continue,
            };

            if let Some(class) = self
                .device_classes
                .get_mut(event.tracked_device_index as usize)
            {
                *class = None;
            }
            self.status = status.into();
            self.dirty = true;
            device_events += 1;

            info!("{} (device {})", status, event.tracked_device_index);
        }

        device_events
    }

    pub fn device_class<A: OpenvrApi>(&mut self, api: &A, device_index: usize) -> TrackedDeviceClass {
        match self.device_classes.get_mut(device_index) {
            Some(Some(class)) => *class,
            Some(slot) => {
                let class = api.tracked_device_class(device_index as u32);
                *slot = Some(class);
                class
            }
            None => TrackedDeviceClass::Invalid,
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
