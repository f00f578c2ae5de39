// Copyright (c) 2023 The ledger-ada Contributors

use ledger_ada_apdu::{
    resp::SerialResp,
    version::{serial_req, version_req, VersionFlags, VersionResp},
};

use super::gated;
use crate::{
    interaction::Interaction,
    types::{DeviceFlags, DeviceVersion, Serial},
};

impl From<VersionResp> for DeviceVersion {
    fn from(v: VersionResp) -> Self {
        Self {
            major: v.major,
            minor: v.minor,
            patch: v.patch,
            flags: DeviceFlags {
                is_debug: v.flags.contains(VersionFlags::DEBUG),
                is_headless: v.flags.contains(VersionFlags::HEADLESS),
            },
        }
    }
}

/// Fetch the app version
pub(crate) fn get_version() -> Interaction<DeviceVersion> {
    Interaction::<VersionResp>::send_fixed(version_req()).map(DeviceVersion::from)
}

/// Fetch the device serial
pub(crate) fn get_serial() -> Interaction<Serial> {
    gated(vec![], |_| {
        Interaction::<SerialResp>::send_fixed(serial_req()).map(|s| Serial {
            serial_hex: hex::encode(s.0),
        })
    })
}
