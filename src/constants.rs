/// 载荷结束标记：15 个 1 之后跟一个 0。
///
/// base64 字符都是 ASCII，每个字节的最高位恒为 0，
/// 因此正常载荷内部不会出现连续 15 个 1。
pub const TERMINATOR: [bool; 16] = [
    true, true, true, true, true, true, true, true, true, true, true, true, true, true, true,
    false,
];

/// 每个载荷字符占用的位数 (高位在前)。
pub const BITS_PER_CHAR: usize = 8;

/// 每个像素参与隐写的通道数 (R, G, B)。
pub const CHANNELS: usize = 3;

/// 图像中找不到结束标记。
pub const MSG_NOT_FOUND: &str = "[Hidden message not found]";

/// 找到了结束标记，但其前面没有有效内容。
pub const MSG_EMPTY: &str = "[No hidden message]";

/// 载荷存在，但无法还原为文本。
pub const MSG_DECODE_ERROR: &str = "[Error decoding hidden message]";
