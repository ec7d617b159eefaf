use crate::api::{endpoints, ApiClient};
use crate::errors::ClientError;
use crate::models::payment::{
    CheckoutRequest, CheckoutSession, CreditPurchase, PaymentVerification, PaymentVerified,
};
use crate::models::user::User;

/// Credits and checkout. Card handling stays with the payment provider; this
/// service only talks to the backend's payment endpoints.
#[derive(Clone)]
pub struct PaymentService {
    client: ApiClient,
}

impl PaymentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Confirms a completed checkout session and credits the account.
    pub async fn verify(&self, session_id: &str) -> Result<PaymentVerified, ClientError> {
        self.client
            .post(
                endpoints::payments::VERIFY,
                &PaymentVerification { session_id },
            )
            .await
    }

    pub async fn create_checkout_session(
        &self,
        credits: u32,
    ) -> Result<CheckoutSession, ClientError> {
        self.client
            .post(
                endpoints::payments::CREATE_CHECKOUT,
                &CheckoutRequest { credits },
            )
            .await
    }

    pub async fn credits(&self) -> Result<f64, ClientError> {
        self.client.get(endpoints::users::CREDITS).await
    }

    pub async fn purchase_credits(&self, amount: f64) -> Result<User, ClientError> {
        self.client
            .post(
                endpoints::users::PURCHASE_CREDITS,
                &CreditPurchase { amount },
            )
            .await
    }
}
