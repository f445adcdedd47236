//! HTML 属性（attribute）の最小表現
//!
//! `name="value"` のペアを表すシンプルな構造体です。
//! ページ側では `id` / `class` / `value` / `data-post-id` くらいしか使いません。

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,  // 例: "class"
    value: String, // 例: "comments hide"
}

impl Attribute {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn name(&self) -> String {
        self.name.clone()
    }

    pub fn value(&self) -> String {
        self.value.clone()
    }

    // 値だけ差し替える（同じ名前の属性を上書きするとき用）
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }
}
