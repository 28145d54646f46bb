//! Transaction and account flag values

// TrustSet transaction flags
pub const TF_SETF_AUTH: u32 = 0x0001_0000;
pub const TF_SET_NO_RIPPLE: u32 = 0x0002_0000;
pub const TF_CLEAR_NO_RIPPLE: u32 = 0x0004_0000;
pub const TF_SET_FREEZE: u32 = 0x0010_0000;
pub const TF_CLEAR_FREEZE: u32 = 0x0020_0000;

// Payment transaction flags
pub const TF_NO_RIPPLE_DIRECT: u32 = 0x0001_0000;
pub const TF_PARTIAL_PAYMENT: u32 = 0x0002_0000;
pub const TF_LIMIT_QUALITY: u32 = 0x0004_0000;

/// `SetFlag` / `ClearFlag` values for AccountSet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum AccountSetFlag {
    RequireDest = 1,
    RequireAuth = 2,
    DisallowXrp = 3,
    DisableMaster = 4,
    AccountTxnId = 5,
    NoFreeze = 6,
    GlobalFreeze = 7,
    DefaultRipple = 8,
    DepositAuth = 9,
}

impl AccountSetFlag {
    pub fn value(self) -> u32 {
        self as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freeze_flags_are_distinct() {
        assert_eq!(TF_SET_FREEZE & TF_CLEAR_FREEZE, 0);
        assert_eq!(TF_SET_FREEZE, 1_048_576);
        assert_eq!(TF_CLEAR_FREEZE, 2_097_152);
    }

    #[test]
    fn test_account_set_flag_values() {
        assert_eq!(AccountSetFlag::RequireAuth.value(), 2);
        assert_eq!(AccountSetFlag::DisallowXrp.value(), 3);
        assert_eq!(AccountSetFlag::DefaultRipple.value(), 8);
    }
}
