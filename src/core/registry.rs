//! Interface registry and role guard

use crate::core::{
    error::{WlanError, WlanResult},
    types::Role,
};

/// One of the two logical interfaces of the radio
#[derive(Debug, PartialEq, Eq)]
pub struct InterfaceHandle {
    role: Role,
}

impl InterfaceHandle {
    pub fn role(&self) -> Role {
        self.role
    }

    /// Wire index of this interface
    pub fn index(&self) -> u8 {
        self.role as u8
    }
}

static INTERFACES: [InterfaceHandle; 2] = [
    InterfaceHandle {
        role: Role::Station,
    },
    InterfaceHandle {
        role: Role::AccessPoint,
    },
];

/// Look up an interface by index (0 = station, 1 = access point)
pub fn resolve(index: i64) -> WlanResult<&'static InterfaceHandle> {
    usize::try_from(index)
        .ok()
        .and_then(|i| INTERFACES.get(i))
        .ok_or(WlanError::OutOfRange(index))
}

/// The station interface, returned when no index is given
pub fn resolve_default() -> &'static InterfaceHandle {
    &INTERFACES[0]
}

/// Handle for a role
pub fn handle_for(role: Role) -> &'static InterfaceHandle {
    match role {
        Role::Station => &INTERFACES[0],
        Role::AccessPoint => &INTERFACES[1],
    }
}

/// Fail unless `handle` has the `expected` role
pub fn require(handle: &InterfaceHandle, expected: Role) -> WlanResult<()> {
    if handle.role != expected {
        return Err(WlanError::RoleMismatch(expected));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_indices() {
        assert_eq!(resolve(0).unwrap().role(), Role::Station);
        assert_eq!(resolve(1).unwrap().role(), Role::AccessPoint);
        assert_eq!(resolve(2), Err(WlanError::OutOfRange(2)));
        assert_eq!(resolve(-1), Err(WlanError::OutOfRange(-1)));
    }

    #[test]
    fn test_handles_are_static_singletons() {
        assert!(std::ptr::eq(resolve(0).unwrap(), resolve_default()));
        assert!(std::ptr::eq(resolve(1).unwrap(), handle_for(Role::AccessPoint)));
        assert_eq!(resolve(1).unwrap().index(), 1);
    }

    #[test]
    fn test_require_matches_role() {
        for index in 0..2 {
            let handle = resolve(index).unwrap();
            assert!(require(handle, handle.role()).is_ok());

            let other = match handle.role() {
                Role::Station => Role::AccessPoint,
                Role::AccessPoint => Role::Station,
            };
            assert_eq!(require(handle, other), Err(WlanError::RoleMismatch(other)));
        }
    }
}
