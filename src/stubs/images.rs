//! Images 服务桩（可选）
//!
//! 记录图像变换请求并原样返回输入数据。只在启用 `images` feature
//! 时编译，feature 缺失即"环境不支持"，注册表静默跳过激活。

use crate::store::RecordLog;
use crate::stubs::ServiceStub;
use serde::{Deserialize, Serialize};

/// 记录的图像变换
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformRecord {
    pub op: String,
    pub width: u32,
    pub height: u32,
}

/// Images 服务桩
#[derive(Debug, Default)]
pub struct ImagesStub {
    transforms: RecordLog<TransformRecord>,
}

impl ImagesStub {
    /// 缩放（仅记录，不做实际变换）
    pub fn resize(&self, data: &[u8], width: u32, height: u32) -> Vec<u8> {
        self.transforms.push(TransformRecord {
            op: "resize".to_string(),
            width,
            height,
        });
        data.to_vec()
    }

    /// 裁剪（仅记录，不做实际变换）
    pub fn crop(&self, data: &[u8], width: u32, height: u32) -> Vec<u8> {
        self.transforms.push(TransformRecord {
            op: "crop".to_string(),
            width,
            height,
        });
        data.to_vec()
    }

    /// 已记录的变换
    pub fn transforms(&self) -> Vec<TransformRecord> {
        self.transforms.snapshot()
    }
}

impl ServiceStub for ImagesStub {
    fn service_name(&self) -> &'static str {
        super::service::IMAGES
    }

    fn reset(&self) {
        self.transforms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_records_and_passes_through() {
        let stub = ImagesStub::default();
        let out = stub.resize(b"png-bytes", 100, 80);

        assert_eq!(out, b"png-bytes");
        let transforms = stub.transforms();
        assert_eq!(transforms.len(), 1);
        assert_eq!(transforms[0].op, "resize");
        assert_eq!(transforms[0].width, 100);
    }
}
