// @generated
// Generated from: proto/tsynctl/v1/tsynctl.proto
// Manual check-in for offline builds.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Empty {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageReply {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
}

pub mod tsynctl_client {
    #![allow(clippy::derive_partial_eq_without_eq)]
    use tonic::codegen::*;

    #[derive(Debug, Clone)]
    pub struct TsynctlClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl TsynctlClient<tonic::transport::Channel> {
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }

    impl<T> TsynctlClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
        <T::ResponseBody as Body>::Data: Into<Bytes> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        pub async fn get_status(
            &mut self,
            request: impl tonic::IntoRequest<super::Empty>,
        ) -> Result<tonic::Response<super::MessageReply>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/tsynctl.v1.Tsynctl/GetStatus",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn get_mode(
            &mut self,
            request: impl tonic::IntoRequest<super::Empty>,
        ) -> Result<tonic::Response<super::MessageReply>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/tsynctl.v1.Tsynctl/GetMode",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn get_time(
            &mut self,
            request: impl tonic::IntoRequest<super::Empty>,
        ) -> Result<tonic::Response<super::MessageReply>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/tsynctl.v1.Tsynctl/GetTime",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
}

pub mod tsynctl_server {
    #![allow(clippy::derive_partial_eq_without_eq)]
    use tonic::codegen::*;

    #[tonic::async_trait]
    pub trait Tsynctl: Send + Sync + 'static {
        async fn get_status(
            &self,
            request: tonic::Request<super::Empty>,
        ) -> Result<tonic::Response<super::MessageReply>, tonic::Status>;
        async fn get_mode(
            &self,
            request: tonic::Request<super::Empty>,
        ) -> Result<tonic::Response<super::MessageReply>, tonic::Status>;
        async fn get_time(
            &self,
            request: tonic::Request<super::Empty>,
        ) -> Result<tonic::Response<super::MessageReply>, tonic::Status>;
    }

    #[derive(Debug)]
    pub struct TsynctlServer<T: Tsynctl> {
        inner: Arc<T>,
    }

    impl<T: Tsynctl> TsynctlServer<T> {
        pub fn new(inner: T) -> Self {
            Self {
                inner: Arc::new(inner),
            }
        }
    }

    impl<T: Tsynctl> Clone for TsynctlServer<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }

    impl<T: Tsynctl> Service<http::Request<tonic::body::BoxBody>> for TsynctlServer<T> {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<tonic::body::BoxBody>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/tsynctl.v1.Tsynctl/GetStatus" => {
                    struct GetStatusSvc<T: Tsynctl>(pub Arc<T>);
                    impl<T: Tsynctl> tonic::server::UnaryService<super::Empty> for GetStatusSvc<T> {
                        type Response = super::MessageReply;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(&mut self, request: tonic::Request<super::Empty>) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.get_status(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = GetStatusSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/tsynctl.v1.Tsynctl/GetMode" => {
                    struct GetModeSvc<T: Tsynctl>(pub Arc<T>);
                    impl<T: Tsynctl> tonic::server::UnaryService<super::Empty> for GetModeSvc<T> {
                        type Response = super::MessageReply;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(&mut self, request: tonic::Request<super::Empty>) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.get_mode(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = GetModeSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/tsynctl.v1.Tsynctl/GetTime" => {
                    struct GetTimeSvc<T: Tsynctl>(pub Arc<T>);
                    impl<T: Tsynctl> tonic::server::UnaryService<super::Empty> for GetTimeSvc<T> {
                        type Response = super::MessageReply;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(&mut self, request: tonic::Request<super::Empty>) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.get_time(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = GetTimeSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::empty_body())
                        .unwrap())
                }),
            }
        }
    }

    impl<T: Tsynctl> tonic::server::NamedService for TsynctlServer<T> {
        const NAME: &'static str = "tsynctl.v1.Tsynctl";
    }
}
