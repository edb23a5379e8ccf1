#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use bk_bean as bean;
pub use bk_reflect as reflect;
pub use bk_utils as utils;
