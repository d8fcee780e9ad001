//! 文件大小的人类可读格式化。

const UNIT: u64 = 1024;
const UNIT_PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// 将字节数格式化为 `"512 B"`、`"1.5 MB"` 形式（1024 进制）。
pub fn format_file_size(bytes: u64) -> String {
    if bytes < UNIT {
        return format!("{bytes} B");
    }

    let mut divisor = UNIT;
    let mut exponent = 0;
    let mut quotient = bytes / UNIT;
    while quotient >= UNIT {
        divisor *= UNIT;
        exponent += 1;
        quotient /= UNIT;
    }

    format!(
        "{:.1} {}B",
        bytes as f64 / divisor as f64,
        UNIT_PREFIXES[exponent]
    )
}
