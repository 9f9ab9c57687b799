/// 钱包地址校验：0x前缀，总长42。不做校验和检查。
/// 调用方在校验与入库前先转为小写。
pub fn is_valid_address(addr: &str) -> bool {
    addr.starts_with("0x") && addr.chars().count() == 42
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_address() {
        assert!(is_valid_address("0x1234567890abcdef1234567890abcdef12345678"));
        // 大小写不敏感，调用方负责归一化
        assert!(is_valid_address("0x1234567890ABCDEF1234567890ABCDEF12345678"));
    }

    #[test]
    fn test_rejects_bad_prefix_or_length() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("0x"));
        assert!(!is_valid_address("1234567890abcdef1234567890abcdef12345678ab"));
        assert!(!is_valid_address("0x1234567890abcdef1234567890abcdef1234567"));
        assert!(!is_valid_address("0x1234567890abcdef1234567890abcdef123456789"));
    }
}
