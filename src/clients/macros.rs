/// Generate client methods with oneshot channel boilerplate and automatic tracing.
///
/// A send or receive failure means the service task has stopped, reported as
/// the error type's `ServiceStopped` variant.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error:ty) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| <$error>::ServiceStopped)?;
                response.await.map_err(|_| <$error>::ServiceStopped)
            }
        }
    };
}
