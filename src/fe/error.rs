#[derive(thiserror::Error, Debug)]
#[allow(non_camel_case_types)]
pub enum Error {
    #[error("RFFE_HAL_ERROR")]
    RFFE_HAL_ERROR,

    #[error("RFFE_REG_ERROR")]
    RFFE_REG_ERROR,

    #[error("RFFE_TRX_ERROR")]
    RFFE_TRX_ERROR,

    #[error("RFFE_SW_ERROR")]
    RFFE_SW_ERROR
}
