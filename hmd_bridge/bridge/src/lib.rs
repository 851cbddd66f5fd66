mod bridge;
mod hmd;
pub mod logging_backend;
pub mod math;
pub mod oculus;
pub mod openvr;
pub mod projection;
pub mod runtime;

#[cfg(test)]
mod test_utils;

pub use bridge::*;
pub use hmd::Hmd;
pub use hmd_bridge_common::{data, settings};

use hmd_bridge_common::{data::*, settings::*, *};
use log::*;
use oculus::{OculusHmd, OvrApi};
use openvr::{OpenvrApi, OpenvrHmd};
use runtime::RuntimeContext;
use std::sync::Arc;

const TRACE_CONTEXT: &str = "HMD bridge";

/// Creates a session on the selected backend. With `BackendSelection::Auto` the runtimes are
/// probed in order (Oculus, then OpenVR) and the first one reporting a connected HMD is used.
pub fn open_hmd<O: OvrApi + 'static, V: OpenvrApi + 'static>(
    oculus: &Arc<RuntimeContext<O>>,
    openvr: &Arc<RuntimeContext<V>>,
    settings: &Settings,
) -> BridgeResult<Box<dyn Hmd>> {
    let backend = match settings.backend {
        BackendSelection::Oculus => Backend::Oculus,
        BackendSelection::Openvr => Backend::Openvr,
        BackendSelection::Auto => {
            if OculusHmd::is_connected(oculus) {
                Backend::Oculus
            } else if OpenvrHmd::is_connected(openvr) {
                Backend::Openvr
            } else {
                return trace_kind!(DeviceUnavailable, "No HMD found on any runtime");
            }
        }
    };

    info!("Opening {:?} backend", backend);

    let hmd: Box<dyn Hmd> = match backend {
        Backend::Oculus => Box::new(OculusHmd::new(oculus, &settings.session)?),
        Backend::Openvr => Box::new(OpenvrHmd::new(openvr, &settings.session)?),
    };

    Ok(hmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{runtime::RuntimeStatus, test_utils::*};

    fn settings(backend: BackendSelection) -> Settings {
        Settings {
            backend,
            ..<_>::default()
        }
    }

    #[test]
    fn auto_prefers_oculus() {
        let oculus = RuntimeContext::new(FakeOvr::default());
        let openvr = RuntimeContext::new(FakeOpenvr::default());

        let hmd = open_hmd(&oculus, &openvr, &settings(BackendSelection::Auto))
            .ok()
            .unwrap();
        assert_eq!(hmd.backend(), Backend::Oculus);
        assert_eq!(openvr.status(), RuntimeStatus::Unloaded);
    }

    #[test]
    fn auto_skips_oculus_runtime_without_hmd() {
        let oculus = RuntimeContext::new(FakeOvr::default());
        let openvr = RuntimeContext::new(FakeOpenvr::default());
        oculus.api().state().hmd_connected = false;

        let hmd = open_hmd(&oculus, &openvr, &settings(BackendSelection::Auto))
            .ok()
            .unwrap();
        assert_eq!(hmd.backend(), Backend::Openvr);
        assert_eq!(oculus.status(), RuntimeStatus::Initialized);
        assert_eq!(oculus.api().count("create"), 0);

        drop(hmd);
        assert_eq!(openvr.api().count("shutdown"), 1);
        assert_eq!(oculus.api().count("shutdown"), 0);
    }

    #[test]
    fn no_hmd_anywhere() {
        let oculus = RuntimeContext::new(FakeOvr::default());
        let openvr = RuntimeContext::new(FakeOpenvr::default());
        oculus.api().state().initialize_ok = false;
        openvr.api().state().hmd_present = false;

        let err = open_hmd(&oculus, &openvr, &settings(BackendSelection::Auto))
            .err()
            .unwrap();
        assert_eq!(err.kind, ErrorKind::DeviceUnavailable);
        assert_eq!(oculus.status(), RuntimeStatus::Failed);
        assert_eq!(openvr.live_sessions(), 0);
    }

    #[test]
    fn explicit_oculus_reports_device_failure() {
        let oculus = RuntimeContext::new(FakeOvr::default());
        let openvr = RuntimeContext::new(FakeOpenvr::default());
        oculus.api().state().create_ok = false;

        let err = open_hmd(&oculus, &openvr, &settings(BackendSelection::Oculus))
            .err()
            .unwrap();
        assert_eq!(err.kind, ErrorKind::DeviceUnavailable);
        assert_eq!(oculus.api().count("shutdown"), 1);
    }
}
